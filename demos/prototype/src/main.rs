//! Example application: bootstrap-time registration followed by
//! request-time resolution and handler dispatch.

use kiln_di::container::Container;
use kiln_di::overrides::Overrides;
use kiln_di::types::Instance;
use tracing_subscriber::EnvFilter;

use crate::modules::mailer::Mailer;

mod modules;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let container = Container::new();

    // Bootstrap: values and wiring the rest of the app depends on.
    container.instance("mail.host", Instance::new(String::from("mail.example.org")));
    modules::mailer::register(&container);
    modules::routes::register(&container);

    tracing::info!("container bootstrapped");

    // Dispatch: inject the handler's dependencies the way route dispatch
    // would, mixing a matched path value with container resolutions.
    let supplied = vec![Instance::new(String::from("ada@example.org"))];
    let arguments = container
        .resolve_method_dependencies(supplied, "MailController", "send")
        .expect("handler dependencies resolve");

    let mailer = arguments[0].downcast::<Mailer>().expect("mailer");
    let recipient = arguments[1].downcast::<String>().expect("recipient");
    println!("delivering to {} via {}", recipient, mailer.describe());

    // A second parameterless resolution reuses the memoized instance.
    let cached = container.make("Mailer").expect("cached mailer");
    assert!(cached.ptr_eq(&arguments[0]));

    // Explicit parameters force a fresh, uncached build.
    let tuned = container
        .make_with("Mailer", Overrides::new().with("retries", 5_u32))
        .expect("tuned mailer");
    println!(
        "tuned: {}",
        tuned.downcast::<Mailer>().expect("mailer").describe()
    );
}
