//! S-expression plist helpers shared by the replay protocol and config files.

use lexpr::Value;

use crate::asl::Vec3;

// ── Responses ──────────────────────────────────────────────

/// An ok response carrying extra `:key value` fields.
pub fn ok_response_with(id: i64, fields: &str) -> String {
    format!("(:type :response :id {} :status :ok {})", id, fields)
}

pub fn error_response(id: i64, reason: &str) -> String {
    format!(
        "(:type :response :id {} :status :error :reason \"{}\")",
        id,
        escape_string(reason)
    )
}

/// Escape a string for s-expression output.
pub fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

// ── Plist access ───────────────────────────────────────────

/// Name of a keyword, accepting both `Value::Keyword("key")` and the
/// `Value::Symbol(":key")` form the default parser produces.
pub fn keyword_name(value: &Value) -> Option<&str> {
    match value {
        Value::Keyword(k) => Some(k.as_ref()),
        Value::Symbol(s) => s.strip_prefix(':'),
        _ => None,
    }
}

/// Raw value following `:key` in a plist.
pub fn get_value<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let mut current = value;
    while let Value::Cons(pair) = current {
        if keyword_name(pair.car()) == Some(key) {
            return match pair.cdr() {
                Value::Cons(next) => Some(next.car()),
                _ => None,
            };
        }
        current = pair.cdr();
    }
    None
}

/// Value following `:key`, rendered as a bare string.
/// Keywords lose their colon, `nil` and `()` become "nil".
pub fn get_keyword(value: &Value, key: &str) -> Option<String> {
    let val = get_value(value, key)?;
    Some(match val {
        Value::Keyword(v) => v.to_string(),
        Value::Symbol(v) => {
            let s: &str = v;
            s.strip_prefix(':').unwrap_or(s).to_string()
        }
        Value::String(v) => v.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => (if *b { "t" } else { "nil" }).to_string(),
        Value::Nil | Value::Null => "nil".to_string(),
        _ => val.to_string(),
    })
}

pub fn get_int(value: &Value, key: &str) -> Option<i64> {
    get_keyword(value, key).and_then(|s| s.parse().ok())
}

pub fn get_float(value: &Value, key: &str) -> Option<f64> {
    get_value(value, key).and_then(number)
}

pub fn get_string(value: &Value, key: &str) -> Option<String> {
    get_keyword(value, key)
}

/// Treats "nil" as false, anything else as true.
pub fn get_bool(value: &Value, key: &str) -> Option<bool> {
    get_keyword(value, key).map(|s| s != "nil")
}

/// Numeric value of a number node.
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Top-level elements of a proper list or vector.
pub fn list_items(value: &Value) -> Vec<&Value> {
    match value {
        Value::Vector(items) => items.iter().collect(),
        _ => {
            let mut out = Vec::new();
            let mut current = value;
            while let Value::Cons(pair) = current {
                out.push(pair.car());
                current = pair.cdr();
            }
            out
        }
    }
}

/// A list of exactly `N` numbers.
pub fn get_numbers<const N: usize>(value: &Value, key: &str) -> Result<Option<[f64; N]>, String> {
    let Some(list) = get_value(value, key) else {
        return Ok(None);
    };
    numbers(list)
        .map(Some)
        .ok_or_else(|| format!(":{} must be a list of {} numbers", key, N))
}

fn numbers<const N: usize>(list: &Value) -> Option<[f64; N]> {
    let items = list_items(list);
    if items.len() != N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = number(item)?;
    }
    Some(out)
}

/// Parse `(x y z)`.
pub fn parse_vec3(value: &Value) -> Option<Vec3> {
    let [x, y, z] = numbers::<3>(value)?;
    Some(Vec3::new(x as f32, y as f32, z as f32))
}

/// Required `(x y z)` under `:key`.
pub fn get_vec3(value: &Value, key: &str) -> Result<Vec3, String> {
    let raw = get_value(value, key).ok_or_else(|| format!("missing :{}", key))?;
    parse_vec3(raw).ok_or_else(|| format!(":{} must be (x y z)", key))
}

/// Keys of a plist in order.  Non-keyword positions are skipped.
pub fn plist_keys(value: &Value) -> Vec<String> {
    list_items(value)
        .chunks(2)
        .filter_map(|pair| keyword_name(pair[0]).map(str::to_string))
        .collect()
}

/// Format a vector for s-expression output.
pub fn format_vec3(v: Vec3) -> String {
    format!("({} {} {})", v.x, v.y, v.z)
}
