//! Edge label vocabulary.
//!
//! Labels depend on the message kind and on which side of the message the
//! edge sits. Data products use their own fixed labels.

use flowmap_core::MessageKind;

pub const ROUTES_TO: &str = "routes to";
/// Consumer declared channels, none of which resolve.
pub const CONSUMES: &str = "consumes";
pub const PUBLISHES_AND_SUBSCRIBES: &str = "publishes and subscribes";
pub const PRODUCES: &str = "produces";
pub const CONSUMED_BY: &str = "consumed by";
pub const INPUT: &str = "input";
pub const OUTPUT: &str = "output";

/// Label for `producer -> message`.
pub fn produced_by(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Command => "invokes",
        MessageKind::Event => "publishes event",
        MessageKind::Query => "requests",
    }
}

/// Label for a direct `message -> consumer` edge.
pub fn consumed_by(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Command | MessageKind::Query => "accepts",
        MessageKind::Event => "subscribed by",
    }
}

/// Label for the last hop `channel -> consumer`.
pub fn consumed_via_channel(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Command | MessageKind::Query => "accepts",
        MessageKind::Event => "subscribed to",
    }
}

/// Verb for a service sending a message, used on dual-role service edges.
pub fn service_sends(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Event => "publishes event",
        MessageKind::Command => "invokes command",
        MessageKind::Query => "requests",
    }
}

/// Verb for a service receiving a message, used on dual-role service edges.
pub fn service_receives(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Event => "receives event",
        MessageKind::Command | MessageKind::Query => "accepts",
    }
}

/// `"<sends> & <receives>"` for a service that both sends and receives.
pub fn service_both(kind: MessageKind) -> String {
    format!("{} & {}", service_sends(kind), service_receives(kind))
}
