use std::time::Duration;

/// Format a duration the way it is shown on annotated images.
///
/// Up to 1000 nanoseconds the duration is shown in nanoseconds, up to 1000 microseconds in
/// microseconds, and in milliseconds above that.
///
/// # Example
///
/// ```
/// use darkhelp::duration::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_nanos(999)), "999 nanoseconds");
/// assert_eq!(format_duration(Duration::from_micros(1500)), "1 milliseconds");
/// ```
pub fn format_duration(duration: Duration) -> String {
    if duration <= Duration::from_nanos(1000) {
        format!("{} nanoseconds", duration.as_nanos())
    } else if duration <= Duration::from_micros(1000) {
        format!("{} microseconds", duration.as_micros())
    } else {
        format!("{} milliseconds", duration.as_millis())
    }
}
