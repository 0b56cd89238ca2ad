//! Route handlers and their declared signatures.

use kiln_di::classes::{ClassMetadata, Param, Signature};
use kiln_di::container::Container;
use kiln_di::types::Instance;

pub struct MailController;

pub fn register(container: &Container) {
    container.register_class(
        ClassMetadata::new("MailController", |_| Ok(Instance::new(MailController))).method(
            "send",
            Signature::new()
                .param(Param::typed("mailer", "Mailer"))
                .param(Param::untyped("recipient")),
        ),
    );
}
