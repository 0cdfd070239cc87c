//! Stubbing, spying and in-order verification around a small service.
//!
//! `Welcome` greets new members through a directory and a mailer. Both
//! collaborators are replaced by doubles: the directory answers from stubs,
//! the mailer spies on a real implementation that only formats text.
//!
//! Run with `RUST_LOG=understudy=trace` to see every recorded call.

use understudy::{
    Double, Result, Session, Template, Value, anything, args, never, verify, verify_with, when,
};

struct Welcome<'a> {
    directory: &'a Double,
    mailer: &'a Double,
}

impl Welcome<'_> {
    fn greet(&self, member: &str) -> Result<Value> {
        let name = self.directory.call("display_name", args![member])?;
        if name.is_undefined() {
            return Ok(Value::Null);
        }
        self.mailer.call("send", args![member, name])
    }
}

fn run() -> Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("understudy=debug")),
        )
        .init();

    let session = Session::default();
    let directory = session.double(Template::new("directory").method("display_name"))?;
    let mailer = session
        .build_double(Template::new("mailer").method_with("send", |_this, args| {
            Value::from(format!("Welcome aboard, {}!", args[1].as_str().unwrap_or("friend")))
        }))
        .spy(true)
        .build()?;

    when(&directory)
        .call("display_name", args!["hst"])?
        .then_return("Hunter");

    let order = session.sequence();
    let welcome = Welcome {
        directory: &directory,
        mailer: &mailer,
    };

    println!("{}", welcome.greet("hst")?);
    println!("{}", welcome.greet("nobody")?);

    verify_with(&directory, order.at_least(1)?).call("display_name", args!["hst"])?;
    verify_with(&mailer, order.at_least(1)?).call("send", args!["hst", anything()])?;
    verify_with(&mailer, never()).call("send", args!["nobody"])?;
    verify(&directory).call("display_name", args!["nobody"])?;

    for interaction in session.interactions() {
        println!("{} {interaction}", interaction.order());
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error while executing example: {e}");
    }
}
