//! Mail delivery wiring.

use std::sync::Arc;

use kiln_di::classes::{ClassMetadata, Param};
use kiln_di::container::Container;
use kiln_di::types::Instance;

pub struct SmtpTransport {
    pub host: Arc<String>,
}

pub struct Mailer {
    pub transport: Instance,
    pub retries: Arc<u32>,
}

impl Mailer {
    pub fn describe(&self) -> String {
        let host = self
            .transport
            .downcast::<SmtpTransport>()
            .map(|transport| transport.host.as_ref().clone())
            .unwrap_or_else(|_| String::from("unknown"));

        format!("smtp host '{}', {} retries", host, self.retries)
    }
}

/// Registers the module's classes and bindings.
///
/// The transport's host comes out of the container too: the typed parameter
/// points at the `mail.host` entry registered during bootstrap.
pub fn register(container: &Container) {
    container.register_class(ClassMetadata::interface("Transport"));

    container.register_class(
        ClassMetadata::new("SmtpTransport", |args| {
            Ok(Instance::new(SmtpTransport {
                host: args.get::<String>(0)?,
            }))
        })
        .param(Param::typed("host", "mail.host"))
        .implements("Transport"),
    );

    container.register_class(
        ClassMetadata::new("Mailer", |args| {
            Ok(Instance::new(Mailer {
                transport: args.raw(0).cloned().ok_or("missing transport")?,
                retries: args.get::<u32>(1)?,
            }))
        })
        .param(Param::typed("transport", "Transport"))
        .param(Param::untyped("retries").with_default(3_u32)),
    );

    container.singleton("Transport", "SmtpTransport");
}
