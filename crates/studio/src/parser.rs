//! Command parsing
//!
//! Two entry points feed the dispatcher:
//! - [`parse_command`] turns free text (typed chat, speech transcripts) into
//!   at most one [`Command`] using prioritized keyword rules.
//! - [`parse_structured`] validates JSON produced by the AI assistant
//!   against the closed tool vocabulary.
//!
//! Neither keeps state between calls.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use shared::{
    named_color, AxisValues, Command, CommandError, MeasureKind, MeasureParams, ObjectType,
    ScaleParams, Vec3, ViewAction,
};

/// Default factor for "bigger" / "scale up"
pub const SCALE_UP_FACTOR: f64 = 1.2;
/// Default factor for "smaller" / "scale down".
///
/// Explicit amounts shrink here (`N%` gives 1 - N/100, `by N` gives 1/N)
/// rather than reusing the scale-up rule verbatim.
pub const SCALE_DOWN_FACTOR: f64 = 0.8;

const NUM: &str = r"-?\d+(?:\.\d+)?";

static HEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([0-9a-f]{6})\b").expect("hex colour pattern"));

static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(red|blue|green|yellow|purple|orange|pink|cyan|white|black|gray|grey)\b")
        .expect("colour name pattern")
});

static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*(?:%|percent\b|per\s+cent\b)").expect("percent pattern"));

static BY_FACTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bby\s+(\d+(?:\.\d+)?)\b").expect("by-factor pattern"));

static TIMES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d+(?:\.\d+)?)\s*(?:x|times)\b|\bx\s*(\d+(?:\.\d+)?)\b").expect("times pattern")
});

static BRACKET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\[\s*({NUM})\s*,\s*({NUM})\s*,\s*({NUM})\s*\]")).expect("bracket pattern")
});

static TRIPLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(?:at|position)\s*[:(]?\s*({NUM})\s*[,\s]\s*({NUM})\s*[,\s]\s*({NUM})"
    ))
    .expect("triple pattern")
});

/// Shape keywords, searched by earliest occurrence
const SHAPE_KEYWORDS: [(&str, ObjectType); 12] = [
    ("box", ObjectType::Box),
    ("cube", ObjectType::Box),
    ("sphere", ObjectType::Sphere),
    ("ball", ObjectType::Sphere),
    ("cylinder", ObjectType::Cylinder),
    ("tube", ObjectType::Cylinder),
    ("cone", ObjectType::Cone),
    ("torus", ObjectType::Torus),
    ("donut", ObjectType::Torus),
    ("doughnut", ObjectType::Torus),
    ("plane", ObjectType::Plane),
    ("wedge", ObjectType::Wedge),
];

fn has_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

/// Parse free text into a command, or `None` when nothing is recognized.
///
/// Rules are checked in priority order; the first match wins. A creation
/// sentence absorbs its colour and position as parameters.
pub fn parse_command(text: &str) -> Option<Command> {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    let cmd = if has_any(&lower, &["add", "create"]) {
        Command::Add {
            shape: extract_shape(&lower).unwrap_or(ObjectType::Box),
            color: extract_color(&lower),
            position: extract_position(&lower),
        }
    } else if has_any(&lower, &["delete", "remove"]) {
        Command::DeleteSelected
    } else if let Some(hex) = extract_color(&lower) {
        Command::ChangeColor(hex)
    } else if has_any(&lower, &["scale up", "bigger", "larger"]) {
        Command::Scale(ScaleParams::Factor(extract_scale_factor(&lower, true)))
    } else if has_any(&lower, &["scale down", "smaller"]) {
        Command::Scale(ScaleParams::Factor(extract_scale_factor(&lower, false)))
    } else if let Some(position) = has_any(&lower, &["move", "position"])
        .then(|| extract_position(&lower))
        .flatten()
    {
        Command::Move(AxisValues::all(position))
    } else if lower.contains("wireframe") {
        Command::View(ViewAction::Wireframe)
    } else if lower.contains("shaded") {
        Command::View(ViewAction::Shaded)
    } else if has_any(&lower, &["reset camera", "reset view"]) {
        Command::View(ViewAction::ResetCamera)
    } else if lower.contains("undo") {
        Command::Undo
    } else if lower.contains("redo") {
        Command::Redo
    } else if has_any(&lower, &["duplicate", "copy"]) {
        Command::DuplicateSelected
    } else if let Some(kind) = extract_measure(&lower) {
        Command::Measure {
            kind,
            params: MeasureParams::default(),
        }
    } else {
        tracing::debug!("no command recognized in {text:?}");
        return None;
    };

    tracing::debug!("parsed {text:?} as {}", cmd.tool_name());
    Some(cmd)
}

/// Validate an AI-produced `{action|name, params}` object
pub fn parse_structured(value: &Value) -> Result<Command, CommandError> {
    Command::from_value(value).inspect_err(|e| tracing::warn!("rejected structured command: {e}"))
}

/// Earliest shape keyword in `text`
fn extract_shape(text: &str) -> Option<ObjectType> {
    SHAPE_KEYWORDS
        .iter()
        .filter_map(|(kw, kind)| text.find(kw).map(|pos| (pos, *kind)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, kind)| kind)
}

/// A literal `#rrggbb` wins over colour names; otherwise the leftmost name
fn extract_color(text: &str) -> Option<String> {
    if let Some(caps) = HEX_RE.captures(text) {
        return Some(format!("#{}", &caps[1]));
    }
    COLOR_RE
        .captures(text)
        .and_then(|caps| named_color(&caps[1]))
        .map(str::to_string)
}

/// `[a, b, c]`, or an `x y z` triple after "at"/"position"
fn extract_position(text: &str) -> Option<Vec3> {
    let caps = BRACKET_RE
        .captures(text)
        .or_else(|| TRIPLE_RE.captures(text))?;
    let mut out = [0.0; 3];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = caps[i + 1].parse().ok()?;
    }
    Some(out)
}

/// Explicit factor in the text, oriented by direction.
///
/// `N%` means grow or shrink by N percent. A bare factor `by N` / `Nx`
/// greater than one shrinks by its reciprocal when scaling down.
fn extract_scale_factor(text: &str, up: bool) -> f64 {
    let default = if up { SCALE_UP_FACTOR } else { SCALE_DOWN_FACTOR };

    let explicit = if let Some(caps) = PERCENT_RE.captures(text) {
        caps[1].parse::<f64>().ok().map(|n| {
            if up {
                1.0 + n / 100.0
            } else {
                1.0 - n / 100.0
            }
        })
    } else {
        BY_FACTOR_RE
            .captures(text)
            .or_else(|| TIMES_RE.captures(text))
            .and_then(|caps| caps.iter().skip(1).flatten().next().map(|m| m.as_str().to_string()))
            .and_then(|n| n.parse::<f64>().ok())
            .map(|n| if !up && n > 1.0 { 1.0 / n } else { n })
    };

    match explicit {
        Some(f) if f.is_finite() && f > 0.0 => f,
        Some(f) => {
            tracing::debug!("scale factor {f} unusable, using {default}");
            default
        }
        None => default,
    }
}

fn extract_measure(text: &str) -> Option<MeasureKind> {
    if text.contains("volume") {
        Some(MeasureKind::Volume)
    } else if text.contains("area") {
        Some(MeasureKind::Area)
    } else if has_any(text, &["distance", "how far"]) {
        Some(MeasureKind::Distance)
    } else {
        None
    }
}

/// Assistant reply split into display text and an optional command
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    pub text: String,
    pub command: Option<Command>,
}

/// Interpret an assistant message body.
///
/// A body that is (or is fenced as) a JSON command object yields that
/// command; a `{message, command}` envelope yields both. Anything else is
/// plain conversational text.
pub fn parse_reply(text: &str) -> AssistantReply {
    let trimmed = text.trim();
    let body = strip_code_fence(trimmed);
    if body.starts_with('{') {
        if let Ok(value) = serde_json::from_str::<Value>(body) {
            let command = extract_command(&value);
            let message = ["message", "text"]
                .iter()
                .find_map(|k| value.get(*k).and_then(Value::as_str))
                .map(str::to_string);
            if command.is_some() || message.is_some() {
                return AssistantReply {
                    text: message.unwrap_or_default(),
                    command,
                };
            }
        }
    }
    AssistantReply {
        text: trimmed.to_string(),
        command: None,
    }
}

/// Command carried by a JSON value, either directly or under `command`
pub fn extract_command(value: &Value) -> Option<Command> {
    match value.get("command") {
        Some(inner) if inner.is_object() => parse_structured(inner).ok(),
        _ if value.get("action").is_some() || value.get("name").is_some() => {
            parse_structured(value).ok()
        }
        _ => None,
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening line
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::{Axis, ToolName};

    #[test]
    fn test_add_defaults_to_box() {
        assert_eq!(
            parse_command("Create something"),
            Some(Command::Add {
                shape: ObjectType::Box,
                color: None,
                position: None
            })
        );
    }

    #[test]
    fn test_add_picks_earliest_shape() {
        match parse_command("add a ball next to the box") {
            Some(Command::Add { shape, .. }) => assert_eq!(shape, ObjectType::Sphere),
            other => panic!("Expected Add, got {other:?}"),
        }
        match parse_command("create a donut") {
            Some(Command::Add { shape, .. }) => assert_eq!(shape, ObjectType::Torus),
            other => panic!("Expected Add, got {other:?}"),
        }
    }

    #[test]
    fn test_add_with_position() {
        assert_eq!(
            parse_command("add a cone at 1 2.5 -3"),
            Some(Command::Add {
                shape: ObjectType::Cone,
                color: None,
                position: Some([1.0, 2.5, -3.0])
            })
        );
    }

    #[test]
    fn test_hex_beats_name() {
        assert_eq!(
            parse_command("make it red, no #00FF00"),
            Some(Command::ChangeColor("#00ff00".into()))
        );
        assert_eq!(
            parse_command("paint it grey"),
            Some(Command::ChangeColor("#6b7280".into()))
        );
    }

    #[test]
    fn test_color_names_need_word_boundary() {
        // "bored" contains "red" but is not a colour
        assert_eq!(parse_command("i am bored"), None);
    }

    #[test]
    fn test_delete_before_color() {
        assert_eq!(parse_command("remove the blue one"), Some(Command::DeleteSelected));
    }

    #[test]
    fn test_scale_factors() {
        let factor = |text: &str| match parse_command(text) {
            Some(Command::Scale(ScaleParams::Factor(f))) => f,
            other => panic!("Expected scale for {text:?}, got {other:?}"),
        };
        assert_eq!(factor("make it bigger"), 1.2);
        assert_eq!(factor("scale up by 50%"), 1.5);
        assert_eq!(factor("make it 3x larger"), 3.0);
        assert_eq!(factor("scale up by 2"), 2.0);
        assert_eq!(factor("smaller please"), 0.8);
        assert_eq!(factor("scale down by 25%"), 0.75);
        assert_eq!(factor("make it 2x smaller"), 0.5);
        assert_eq!(factor("scale down by 0.5"), 0.5);
        assert_eq!(factor("scale down by 150%"), 0.8);
        assert_eq!(factor("scale down by 50%"), 0.5);
        assert_eq!(factor("make it smaller by 2"), 0.5);
    }

    #[test]
    fn test_percent_spelled_out() {
        let factor = |text: &str| match parse_command(text) {
            Some(Command::Scale(ScaleParams::Factor(f))) => f,
            other => panic!("Expected scale for {text:?}, got {other:?}"),
        };
        assert_eq!(factor("scale up by 50 percent"), 1.5);
        assert_eq!(factor("make it bigger by 20 per cent"), 1.2);
        assert_eq!(factor("scale down by 25 percent"), 0.75);
    }

    #[test]
    fn test_move_needs_triple() {
        assert_eq!(
            parse_command("move it to [1, -2, 3.5]"),
            Some(Command::Move(AxisValues::all([1.0, -2.0, 3.5])))
        );
        assert_eq!(
            parse_command("set position 0, 1, 0"),
            Some(Command::Move(AxisValues::all([0.0, 1.0, 0.0])))
        );
        assert_eq!(parse_command("move it a bit"), None);
    }

    #[test]
    fn test_view_and_history_rules() {
        assert_eq!(parse_command("show wireframe"), Some(Command::View(ViewAction::Wireframe)));
        assert_eq!(parse_command("back to shaded"), Some(Command::View(ViewAction::Shaded)));
        assert_eq!(parse_command("Reset View"), Some(Command::View(ViewAction::ResetCamera)));
        assert_eq!(parse_command("undo that"), Some(Command::Undo));
        assert_eq!(parse_command("redo"), Some(Command::Redo));
    }

    #[test]
    fn test_supplementary_rules() {
        assert_eq!(parse_command("duplicate it"), Some(Command::DuplicateSelected));
        assert_eq!(
            parse_command("what is the volume?"),
            Some(Command::Measure {
                kind: MeasureKind::Volume,
                params: MeasureParams::default()
            })
        );
        assert_eq!(
            parse_command("how far apart are they").map(|c| c.tool_name()),
            Some(ToolName::MeasureDistance)
        );
    }

    #[test]
    fn test_unrecognized_is_stable() {
        assert_eq!(parse_command("hello there"), None);
        assert_eq!(parse_command("hello there"), None);
        assert_eq!(parse_command("   "), None);
    }

    #[test]
    fn test_parse_structured() {
        assert_eq!(
            parse_structured(&json!({"action": "move-y", "params": {"value": 2}})),
            Ok(Command::Move(AxisValues::single(Axis::Y, 2.0)))
        );
        assert!(matches!(
            parse_structured(&json!({"action": "explode"})),
            Err(CommandError::UnknownAction(_))
        ));
    }

    #[test]
    fn test_parse_reply_plain_text() {
        let reply = parse_reply("  Sure, what shape would you like?  ");
        assert_eq!(reply.text, "Sure, what shape would you like?");
        assert!(reply.command.is_none());
    }

    #[test]
    fn test_parse_reply_fenced_command() {
        let reply = parse_reply("```json\n{\"action\": \"add-torus\", \"params\": {\"color\": \"#112233\"}}\n```");
        assert_eq!(reply.text, "");
        assert_eq!(
            reply.command,
            Some(Command::Add {
                shape: ObjectType::Torus,
                color: Some("#112233".into()),
                position: None
            })
        );
    }

    #[test]
    fn test_parse_reply_envelope() {
        let reply = parse_reply(r#"{"message": "Done!", "command": {"name": "undo"}}"#);
        assert_eq!(reply.text, "Done!");
        assert_eq!(reply.command, Some(Command::Undo));

        // Invalid commands are dropped, the text survives
        let reply = parse_reply(r#"{"message": "Trying", "command": {"action": "warp"}}"#);
        assert_eq!(reply.text, "Trying");
        assert!(reply.command.is_none());
    }
}
