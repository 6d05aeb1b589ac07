//! Pure eligibility evaluation: quiet hours and per-channel permission.
//!
//! Nothing here performs I/O or reads a clock. Callers pass the wall-clock
//! time to evaluate against; [`local_time`] turns a UTC instant into that
//! wall-clock time for a snapshot's stored time zone.

use chrono::{FixedOffset, NaiveTime};
use serde::Serialize;

use crate::channels::Channel;
use crate::preferences::PreferenceSnapshot;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Quiet hours
// ---------------------------------------------------------------------------

/// Whether `now` falls inside the open interval `(start, end)`.
///
/// A window with `start > end` crosses midnight. Either bound missing means
/// there are no quiet hours. Instants equal to a bound are outside.
pub fn in_window(start: Option<NaiveTime>, end: Option<NaiveTime>, now: NaiveTime) -> bool {
    let (Some(start), Some(end)) = (start, end) else {
        return false;
    };

    if start <= end {
        start < now && now < end
    } else {
        now > start || now < end
    }
}

/// Whether the snapshot's owner is in quiet hours at wall-clock time `now`.
pub fn is_in_quiet_hours(snapshot: &PreferenceSnapshot, now: NaiveTime) -> bool {
    in_window(
        snapshot.fields.quiet_hours_start,
        snapshot.fields.quiet_hours_end,
        now,
    )
}

// ---------------------------------------------------------------------------
// Channel permission
// ---------------------------------------------------------------------------

/// Whether a notification on `channel` may be delivered at `now`.
///
/// Quiet hours block every channel. Channel names match case-insensitively;
/// unknown names and channels without a stored flag are denied.
pub fn can_deliver(snapshot: &PreferenceSnapshot, channel: &str, now: NaiveTime) -> bool {
    if is_in_quiet_hours(snapshot, now) {
        return false;
    }

    match Channel::parse(channel) {
        Some(channel) => snapshot.fields.channel(channel),
        None => false,
    }
}

/// Derived flags reported next to a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    pub in_quiet_hours: bool,
    pub can_receive_email: bool,
    pub can_receive_push: bool,
    pub can_receive_sms: bool,
}

impl Eligibility {
    /// Evaluate all flags for `snapshot` at wall-clock time `now`.
    ///
    /// The per-channel flags reflect the stored setting only; combine with
    /// `in_quiet_hours` (or call [`can_deliver`]) for a send decision.
    pub fn evaluate(snapshot: &PreferenceSnapshot, now: NaiveTime) -> Self {
        Self {
            in_quiet_hours: is_in_quiet_hours(snapshot, now),
            can_receive_email: snapshot.fields.channel(Channel::Email),
            can_receive_push: snapshot.fields.channel(Channel::Push),
            can_receive_sms: snapshot.fields.channel(Channel::Sms),
        }
    }
}

// ---------------------------------------------------------------------------
// Time zone resolution
// ---------------------------------------------------------------------------

/// Wall-clock time of `now` in the given time zone identifier.
///
/// `UTC`, `GMT`, `Z` and fixed offsets (`+02:00`, `-0530`, `UTC+3`,
/// `GMT-04:00`) are honoured. Region names such as `Europe/Madrid` need a
/// tz database and fall back to this process's local clock.
pub fn local_time(timezone: &str, now: Timestamp) -> NaiveTime {
    match parse_fixed_offset(timezone) {
        Some(offset) => now.with_timezone(&offset).time(),
        None => now.with_timezone(&chrono::Local).time(),
    }
}

/// Parse a fixed UTC offset identifier. Returns `None` for anything else.
pub fn parse_fixed_offset(timezone: &str) -> Option<FixedOffset> {
    let tz = timezone.trim();
    if tz.eq_ignore_ascii_case("Z") {
        return FixedOffset::east_opt(0);
    }

    let rest = strip_prefix_ignore_case(tz, "UTC")
        .or_else(|| strip_prefix_ignore_case(tz, "GMT"))
        .unwrap_or(tz);
    if rest.is_empty() {
        // Bare "UTC" / "GMT".
        return if rest.len() != tz.len() {
            FixedOffset::east_opt(0)
        } else {
            None
        };
    }

    let (sign, digits) = match rest.as_bytes()[0] {
        b'+' => (1, &rest[1..]),
        b'-' => (-1, &rest[1..]),
        _ => return None,
    };

    if !digits.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        return None;
    }

    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None if digits.len() == 4 => digits.split_at(2),
        None => (digits, "0"),
    };
    if hours.is_empty() || hours.len() > 2 || minutes.is_empty() || minutes.contains(':') {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// `str::get` keeps a prefix length that lands inside a multi-byte
/// character from panicking.
fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        s.get(prefix.len()..)
    } else {
        None
    }
}
