//! Stage spans and count events for the detection pipeline.
//!
//! Every engine call runs up to three stages and each one opens a span:
//!
//! | span | opened by | fields |
//! |---|---|---|
//! | `infer_detections` / `infer_row_detections` | engine | `grid` or `rows` |
//! | `decode_grid` / `decode_rows` | decoder | layout dimensions or row count |
//! | `suppress` | NMS | `proposals`, `max` |
//!
//! Stages close with a debug event: `decoded_proposals { count }` after
//! decoding, `suppressed { accepted }` after NMS and `detections { count }`
//! at the end of the call. Without the `tracing` feature spans become
//! [`StageGuard`] and event fields are evaluated and dropped.

/// Span stand-in returned by `trace_span!` without the `tracing` feature.
#[cfg(not(feature = "tracing"))]
pub struct StageGuard;

#[cfg(not(feature = "tracing"))]
impl StageGuard {
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}

#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($stage:literal $(, $($field:tt)*)?) => {
        tracing::info_span!($stage $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($stage:literal $(, $($field:tt)*)?) => {
        $crate::trace::StageGuard
    };
}

#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($event:literal, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::debug!(name: $event, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($event:literal, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
}

pub(crate) use trace_event;
pub(crate) use trace_span;
