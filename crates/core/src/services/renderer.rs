//! Message rendering.
//!
//! Pure: given the same type, org name, and data, the output is identical.
//! The only nondeterminism in the whole pipeline is the webhook envelope's
//! timestamp, which is stamped at send time, not here.

use serde_json::{Map, Value};

use pantry_common::escape_html;

use crate::types::{NotificationKind, RenderedMessage};

/// Render a notification into transport-agnostic content.
#[must_use]
pub fn render_message(
    kind: &NotificationKind,
    org_name: &str,
    data: &Map<String, Value>,
) -> RenderedMessage {
    let task_desc = str_field(data, "taskDescription", "Pickup task");
    let task_loc = str_field(data, "taskLocation", "");
    let claimed_by = str_field(data, "claimedBy", "Someone");
    let member_name = str_field(data, "memberName", "A new member");

    let at_loc = if task_loc.is_empty() {
        String::new()
    } else {
        format!(" at {task_loc}")
    };

    let (subject, heading, body_html, body_text, computed) = match kind {
        NotificationKind::Welcome => (
            format!("Welcome to {org_name}"),
            "Welcome!".to_string(),
            format!(
                "<p>You've joined <strong>{}</strong>.</p>\
                 <p>You can now view the directory, claim pickups, and post community needs.</p>\
                 <p style=\"color: rgba(255,255,255,0.5); font-size: 11px; margin-top: 24px;\">\
                 Log in anytime to check your queue and connect with your community.</p>",
                escape_html(org_name)
            ),
            format!(
                "Welcome to {org_name}! You can now view the directory, claim pickups, and post community needs."
            ),
            Map::new(),
        ),

        NotificationKind::AdminJoin => (
            format!("New member joined {org_name}"),
            "New Member Joined".to_string(),
            format!(
                "<p><strong>{}</strong> has joined {}.</p>\
                 <p>They can now access the directory and claim pickups.</p>",
                escape_html(&member_name),
                escape_html(org_name)
            ),
            format!("{member_name} has joined {org_name}."),
            map_of(&[("memberName", &member_name)]),
        ),

        NotificationKind::PickupClaimed => (
            format!("Pickup claimed — {org_name}"),
            "Pickup Claimed".to_string(),
            format!(
                "<p><strong>{}</strong> claimed a pickup:</p>{}",
                escape_html(&claimed_by),
                task_block(&task_desc, &task_loc, "#82b1ff")
            ),
            format!("{claimed_by} claimed: {task_desc}{at_loc}"),
            map_of(&[
                ("taskDescription", &task_desc),
                ("taskLocation", &task_loc),
                ("claimedBy", &claimed_by),
            ]),
        ),

        NotificationKind::PickupDelivered => (
            format!("Pickup delivered — {org_name}"),
            "Pickup Delivered".to_string(),
            format!(
                "<p>A pickup has been delivered:</p>{}\
                 <p style=\"color: rgba(255,255,255,0.6);\">Ready to be marked as STOCKED.</p>",
                task_block(&task_desc, &task_loc, "#69f0ae")
            ),
            format!("Delivered: {task_desc}{at_loc}"),
            map_of(&[
                ("taskDescription", &task_desc),
                ("taskLocation", &task_loc),
            ]),
        ),

        NotificationKind::PickupStocked => (
            format!("Items stocked — {org_name}"),
            "Pickup Stocked".to_string(),
            format!(
                "<p>Items have been stocked and are ready for the community:</p>{}",
                task_block(&task_desc, &task_loc, "#69f0ae")
            ),
            format!("Stocked: {task_desc}{at_loc}"),
            map_of(&[
                ("taskDescription", &task_desc),
                ("taskLocation", &task_loc),
            ]),
        ),

        NotificationKind::DailyDigest => (
            format!("Daily digest — {org_name}"),
            "Daily Digest".to_string(),
            "<p>Your daily pantry activity summary.</p>".to_string(),
            format!("Daily digest for {org_name}."),
            Map::new(),
        ),

        NotificationKind::Other(_) => {
            let message = str_field(data, "message", "");
            (
                str_field(data, "subject", &format!("Notification from {org_name}")),
                str_field(data, "heading", "Notification"),
                format!("<p>{}</p>", escape_html(&message)),
                message,
                Map::new(),
            )
        }
    };

    // Computed fields first, then the caller's data (caller wins), with
    // type/orgName always reflecting the render inputs.
    let mut body_json = computed;
    for (key, value) in data {
        body_json.insert(key.clone(), value.clone());
    }
    body_json.insert("type".to_string(), Value::String(kind.as_str().to_string()));
    body_json.insert("orgName".to_string(), Value::String(org_name.to_string()));

    RenderedMessage {
        kind: kind.clone(),
        org_name: org_name.to_string(),
        subject,
        heading,
        body_html,
        body_text,
        body_json,
    }
}

/// Read a string field from caller data with a default.
///
/// Falsy scalars (null, empty string, `false`, zero) fall back to the
/// default, matching the truthiness rules the templates were written
/// against. Truthy non-strings are stringified.
#[allow(clippy::float_cmp)] // Exact zero test, no arithmetic involved
fn str_field(data: &Map<String, Value>, key: &str, default: &str) -> String {
    match data.get(key) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        Some(other @ (Value::Array(_) | Value::Object(_))) => other.to_string(),
        _ => default.to_string(),
    }
}

fn map_of(fields: &[(&str, &str)]) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| ((*k).to_string(), Value::String((*v).to_string())))
        .collect()
}

fn task_block(desc: &str, loc: &str, color: &str) -> String {
    let loc_html = if loc.is_empty() {
        String::new()
    } else {
        format!(
            "<div style=\"color: rgba(255,255,255,0.6); font-size: 12px; margin-top: 4px;\">{}</div>",
            escape_html(loc)
        )
    };
    format!(
        "<div style=\"padding: 12px; border-left: 3px solid {color}; margin: 12px 0;\">\
         <div style=\"font-weight: 700;\">{}</div>{loc_html}</div>",
        escape_html(desc)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_welcome_renders_subject_and_body() {
        let msg = render_message(
            &NotificationKind::Welcome,
            "Ward Food Pantry",
            &data(json!({ "memberEmail": "alice@test.com" })),
        );
        assert_eq!(msg.subject, "Welcome to Ward Food Pantry");
        assert_eq!(msg.heading, "Welcome!");
        assert!(msg.body_text.contains("Welcome to Ward Food Pantry"));
        assert!(msg.body_text.contains("claim pickups"));
        assert_eq!(msg.body_json["memberEmail"], "alice@test.com");
    }

    #[test]
    fn test_admin_join_includes_member_name() {
        let msg = render_message(
            &NotificationKind::AdminJoin,
            "Mountain Pantry",
            &data(json!({ "memberName": "bob@test.com" })),
        );
        assert_eq!(msg.subject, "New member joined Mountain Pantry");
        assert!(msg.body_text.contains("bob@test.com"));
        assert!(msg.body_text.contains("Mountain Pantry"));
    }

    #[test]
    fn test_pickup_claimed_includes_task_details() {
        let msg = render_message(
            &NotificationKind::PickupClaimed,
            "Ward Pantry",
            &data(json!({
                "taskDescription": "20 cans of soup",
                "taskLocation": "King Soopers",
                "claimedBy": "Alice",
            })),
        );
        assert_eq!(msg.subject, "Pickup claimed — Ward Pantry");
        assert_eq!(msg.body_text, "Alice claimed: 20 cans of soup at King Soopers");
        assert_eq!(msg.body_json["taskDescription"], "20 cans of soup");
    }

    #[test]
    fn test_pickup_delivered_and_stocked_bodies() {
        let fields = data(json!({
            "taskDescription": "Fresh bread",
            "taskLocation": "Community Center",
        }));

        let delivered = render_message(&NotificationKind::PickupDelivered, "Pantry A", &fields);
        assert_eq!(delivered.subject, "Pickup delivered — Pantry A");
        assert!(delivered.body_text.contains("Delivered: Fresh bread"));
        assert!(delivered.body_text.contains("Community Center"));

        let stocked = render_message(&NotificationKind::PickupStocked, "Pantry B", &fields);
        assert_eq!(stocked.subject, "Items stocked — Pantry B");
        assert!(stocked.body_text.contains("Stocked: Fresh bread"));
    }

    #[test]
    fn test_daily_digest_uses_org_name() {
        let msg = render_message(&NotificationKind::DailyDigest, "Ward Food Pantry", &Map::new());
        assert_eq!(msg.subject, "Daily digest — Ward Food Pantry");
        assert!(msg.body_text.contains("Ward Food Pantry"));
    }

    #[test]
    fn test_unknown_type_falls_back_to_data_fields() {
        let msg = render_message(
            &NotificationKind::Other("custom".to_string()),
            "Test Pantry",
            &data(json!({
                "subject": "Custom Subject",
                "heading": "Custom Heading",
                "message": "Custom body text",
            })),
        );
        assert_eq!(msg.subject, "Custom Subject");
        assert_eq!(msg.heading, "Custom Heading");
        assert_eq!(msg.body_text, "Custom body text");
    }

    #[test]
    fn test_unknown_type_without_data_still_has_subject() {
        let msg = render_message(
            &NotificationKind::Other("custom".to_string()),
            "Test Pantry",
            &Map::new(),
        );
        assert_eq!(msg.subject, "Notification from Test Pantry");
        assert_eq!(msg.heading, "Notification");
    }

    #[test]
    fn test_missing_task_data_uses_defaults() {
        let msg = render_message(&NotificationKind::PickupClaimed, "Pantry", &Map::new());
        assert!(msg.body_text.contains("Someone claimed: Pickup task"));
        assert_eq!(msg.body_json["claimedBy"], "Someone");
        assert_eq!(msg.body_json["taskDescription"], "Pickup task");
    }

    #[test]
    fn test_falsy_scalars_fall_back_to_defaults() {
        let msg = render_message(
            &NotificationKind::PickupClaimed,
            "Pantry",
            &data(json!({ "taskDescription": 0, "claimedBy": false })),
        );
        assert!(msg.body_text.contains("Someone claimed: Pickup task"));

        let truthy = render_message(
            &NotificationKind::PickupClaimed,
            "Pantry",
            &data(json!({ "taskDescription": 12, "claimedBy": true })),
        );
        assert!(truthy.body_text.contains("true claimed: 12"));
    }

    #[test]
    fn test_body_json_carries_type_and_org_name() {
        let msg = render_message(
            &NotificationKind::PickupClaimed,
            "Pantry",
            &data(json!({ "type": "spoofed", "orgName": "spoofed" })),
        );
        assert_eq!(msg.body_json["type"], "pickup-claimed");
        assert_eq!(msg.body_json["orgName"], "Pantry");
    }

    #[test]
    fn test_caller_data_overrides_computed_defaults() {
        let msg = render_message(
            &NotificationKind::PickupClaimed,
            "Pantry",
            &data(json!({ "claimedBy": "Alice", "extra": 7 })),
        );
        assert_eq!(msg.body_json["claimedBy"], "Alice");
        assert_eq!(msg.body_json["extra"], 7);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let fields = data(json!({ "taskDescription": "20 lbs rice", "claimedBy": "Alice" }));
        let a = render_message(&NotificationKind::PickupClaimed, "Pantry", &fields);
        let b = render_message(&NotificationKind::PickupClaimed, "Pantry", &fields);
        assert_eq!(a.subject, b.subject);
        assert_eq!(a.heading, b.heading);
        assert_eq!(a.body_text, b.body_text);
        assert_eq!(a.body_json, b.body_json);
    }

    #[test]
    fn test_html_body_escapes_task_fields() {
        let msg = render_message(
            &NotificationKind::PickupClaimed,
            "Pantry",
            &data(json!({ "taskDescription": "Beans & <rice>" })),
        );
        assert!(msg.body_html.contains("Beans &amp; &lt;rice&gt;"));
        assert!(msg.body_text.contains("Beans & <rice>"));
    }
}
