//! Message dispatch: parse one s-expression and route it to the classifier.

use lexpr::Value;
use tracing::{debug, warn};

use crate::asl::{ClassifierHandle, FingerId, FingerPose, FrameSample, Hand, HandFrame, Vec3};

use super::sexp::{
    error_response, get_float, get_int, get_keyword, get_string, get_value, get_vec3, list_items,
    ok_response_with, parse_vec3,
};

/// Parse a message and dispatch it.  Returns the response to send, if any.
///
/// Successful frames produce no response; their outcome is reported through
/// classifier events.  Anything malformed gets an error response and leaves
/// the classifier untouched.
pub fn handle_message(handle: &ClassifierHandle, raw: &str) -> Option<String> {
    let value = match lexpr::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!("malformed s-expression: {}", e);
            return Some(error_response(0, &format!("malformed s-expression: {e}")));
        }
    };

    let msg_type = get_keyword(&value, "type");
    let msg_id = get_int(&value, "id").unwrap_or(0);

    match msg_type.as_deref() {
        Some("frame") => handle_frame(handle, msg_id, &value),
        Some("letter") => handle_letter(handle, msg_id),
        Some("compare") => handle_compare(handle, msg_id, &value),
        Some("set-dwell") => handle_set_dwell(handle, msg_id, &value),
        Some("status") => handle_status(handle, msg_id),
        Some("config") => handle_config(handle, msg_id),
        Some(other) => {
            debug!("unknown message type: {}", other);
            Some(error_response(msg_id, &format!("unknown message type: {other}")))
        }
        None => Some(error_response(msg_id, "missing :type")),
    }
}

fn handle_frame(handle: &ClassifierHandle, msg_id: i64, value: &Value) -> Option<String> {
    let timestamp_ms = get_float(value, "t").unwrap_or_else(|| handle.now_ms());
    match parse_frame(value, timestamp_ms) {
        Ok(sample) => {
            handle.process(&sample);
            None
        }
        Err(reason) => {
            warn!(msg_id, "rejected frame: {}", reason);
            Some(error_response(msg_id, &reason))
        }
    }
}

fn handle_letter(handle: &ClassifierHandle, msg_id: i64) -> Option<String> {
    let letter = handle
        .letter()
        .map(|c| format!("\"{}\"", c))
        .unwrap_or_else(|| "nil".to_string());
    Some(ok_response_with(
        msg_id,
        &format!(":letter {} :class :{}", letter, handle.ambiguity().as_str()),
    ))
}

fn handle_compare(handle: &ClassifierHandle, msg_id: i64, value: &Value) -> Option<String> {
    let letter = match get_string(value, "letter").as_deref().map(str::chars) {
        Some(mut chars) => match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => c,
            _ => return Some(error_response(msg_id, ":letter must be a single letter")),
        },
        None => return Some(error_response(msg_id, "missing :letter")),
    };
    let matched = handle.compare_letter(letter);
    Some(ok_response_with(
        msg_id,
        &format!(":match {}", if matched { "t" } else { "nil" }),
    ))
}

fn handle_set_dwell(handle: &ClassifierHandle, msg_id: i64, value: &Value) -> Option<String> {
    let ms = match get_float(value, "ms") {
        Some(ms) => ms,
        None => return Some(error_response(msg_id, "missing :ms")),
    };
    match handle.set_dwell_ms(ms) {
        Ok(()) => Some(ok_response_with(msg_id, &format!(":dwell-ms {:.0}", ms))),
        Err(e) => Some(error_response(msg_id, &e.to_string())),
    }
}

fn handle_status(handle: &ClassifierHandle, msg_id: i64) -> Option<String> {
    Some(ok_response_with(
        msg_id,
        &format!(":classifier {}", handle.status_sexp()),
    ))
}

fn handle_config(handle: &ClassifierHandle, msg_id: i64) -> Option<String> {
    Some(ok_response_with(
        msg_id,
        &format!(":config {}", handle.config_sexp()),
    ))
}

// ── Frame parsing ──────────────────────────────────────────

/// Build a sample from a `:frame` message.
///
/// `:hands` is the number of hands the sensor saw.  Only a count of one
/// carries geometry; any other count is a sample with no usable hand.
pub fn parse_frame(value: &Value, timestamp_ms: f64) -> Result<FrameSample, String> {
    let hands = match get_value(value, "hands") {
        None => 1,
        Some(_) => get_int(value, "hands")
            .filter(|n| *n >= 0)
            .ok_or_else(|| ":hands must be a non-negative integer".to_string())?,
    };
    if hands != 1 {
        debug!("frame with {} hands treated as tracking loss", hands);
        return Ok(FrameSample::empty(timestamp_ms));
    }
    let hand = parse_hand(value)?;
    Ok(FrameSample::new(vec![hand], timestamp_ms))
}

fn parse_hand(value: &Value) -> Result<HandFrame, String> {
    let hand = match get_keyword(value, "hand").as_deref() {
        Some("left") => Hand::Left,
        Some("right") => Hand::Right,
        Some(other) => return Err(format!("unknown :hand {other}")),
        None => return Err("missing :hand".to_string()),
    };

    let mut fingers: [FingerPose; 5] = Default::default();
    for finger in FingerId::ALL {
        let plist = get_value(value, finger.as_str())
            .ok_or_else(|| format!("missing :{}", finger.as_str()))?;
        fingers[finger.index()] =
            parse_finger(plist).map_err(|e| format!("{}: {}", finger.as_str(), e))?;
    }

    Ok(HandFrame {
        hand,
        palm_position: get_vec3(value, "palm")?,
        palm_normal: get_vec3(value, "normal")?,
        direction: get_vec3(value, "direction")?,
        fingers,
    })
}

fn parse_finger(value: &Value) -> Result<FingerPose, String> {
    let tip = get_vec3(value, "tip")?;
    let stabilized_tip = match get_value(value, "stabilized-tip") {
        Some(_) => get_vec3(value, "stabilized-tip")?,
        None => tip,
    };
    let direction = get_vec3(value, "direction")?;

    let raw_joints = get_value(value, "joints").ok_or("missing :joints")?;
    let items = list_items(raw_joints);
    if items.len() != 5 {
        return Err(format!(":joints needs 5 points, got {}", items.len()));
    }
    let mut joints = [Vec3::ZERO; 5];
    for (slot, item) in joints.iter_mut().zip(items) {
        *slot = parse_vec3(item).ok_or(":joints entries must be (x y z)")?;
    }

    Ok(FingerPose::from_joints(joints, tip, stabilized_tip, direction))
}
