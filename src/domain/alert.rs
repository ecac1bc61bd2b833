use serde::{Deserialize, Serialize};

/// Display colour of an alert. Red and amber are the warning tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertColor {
    Red,
    Amber,
    Blue,
    Green,
    Purple,
    Yellow,
    Cyan,
    Orange,
    Pink,
    Indigo,
}

impl AlertColor {
    pub fn is_critical(self) -> bool {
        matches!(self, AlertColor::Red | AlertColor::Amber)
    }
}

/// A single user-facing notification. Value object, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub icon: String,
    #[serde(rename = "severity_color")]
    pub color: AlertColor,
    pub message: String,
}

impl Alert {
    pub fn new(icon: impl Into<String>, color: AlertColor, message: impl Into<String>) -> Self {
        Self {
            icon: icon.into(),
            color,
            message: message.into(),
        }
    }

    pub fn is_critical(&self) -> bool {
        self.color.is_critical()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Full replacement of the client's alert list.
    Alerts,
    /// One immediate event shown ahead of the next full list.
    SingleAlert,
}

/// Logical shape pushed to live connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub items: Vec<Alert>,
    pub count: usize,
}

impl OutboundMessage {
    pub fn alerts(items: Vec<Alert>) -> Self {
        let count = items.len();
        Self {
            kind: MessageKind::Alerts,
            items,
            count,
        }
    }

    pub fn single(alert: Alert) -> Self {
        Self {
            kind: MessageKind::SingleAlert,
            items: vec![alert],
            count: 1,
        }
    }

    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_red_and_amber_are_critical() {
        assert!(AlertColor::Red.is_critical());
        assert!(AlertColor::Amber.is_critical());
        assert!(!AlertColor::Green.is_critical());
        assert!(!AlertColor::Yellow.is_critical());
    }

    #[test]
    fn payload_uses_wire_field_names() {
        let message = OutboundMessage::single(Alert::new("✅", AlertColor::Green, "ok"));
        let value: serde_json::Value =
            serde_json::from_str(&message.to_payload().unwrap()).unwrap();
        assert_eq!(value["type"], "single_alert");
        assert_eq!(value["count"], 1);
        assert_eq!(value["items"][0]["severity_color"], "green");
    }
}
