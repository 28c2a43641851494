use std::fmt;

pub mod client;
mod format;
pub mod handler;
mod job;
pub mod macros;
mod tags;
pub mod writer;

pub use format::format_line;
pub use tags::render_tags;

/// Default datagram size ceiling in bytes.
pub const DEFAULT_MAX_PACKET_SIZE: usize = 1500;

/// The kind of metric a line carries, rendered as the `|<type>` field of the wire line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MetricType {
    /// A signed counter delta (`c`).
    Count,
    /// A point-in-time reading (`g`).
    Gauge,
    /// A duration in milliseconds (`ms`).
    Timer,
    /// A sample in a distribution (`h`).
    Histogram,
}

impl MetricType {
    /// Returns the protocol code for this metric type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Count => "c",
            Self::Gauge => "g",
            Self::Timer => "ms",
            Self::Histogram => "h",
        }
    }
}

/// A numeric observation, either integral or floating-point.
///
/// Integers are rendered in base 10 without grouping. Floats are rendered with `.` as the
/// decimal separator and at most six fractional digits, whatever the host locale, with
/// `NaN`, `Infinity` and `-Infinity` for the non-finite values.
///
/// ```
/// use insight_statsd::MetricValue;
///
/// assert_eq!(MetricValue::from(423).to_string(), "423");
/// assert_eq!(MetricValue::from(123.456_789_012_345_67).to_string(), "123.456789");
/// assert_eq!(MetricValue::from(f64::NAN).to_string(), "NaN");
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MetricValue {
    /// A signed integer.
    Integer(i64),
    /// An unsigned integer too large for `Integer`.
    Unsigned(u64),
    /// A floating-point number.
    Float(f64),
}

impl MetricValue {
    pub(crate) fn write_to(self, out: &mut String) {
        match self {
            Self::Integer(v) => out.push_str(itoa::Buffer::new().format(v)),
            Self::Unsigned(v) => out.push_str(itoa::Buffer::new().format(v)),
            Self::Float(v) => format::write_float(out, v),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rendered = String::new();
        self.write_to(&mut rendered);
        f.write_str(&rendered)
    }
}

macro_rules! metric_value_from {
    ($variant:ident: $($ty:ty),+) => {
        $(
            impl From<$ty> for MetricValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )+
    };
}

metric_value_from!(Integer: i8, i16, i32, i64, u8, u16, u32);
metric_value_from!(Unsigned: u64);
metric_value_from!(Float: f32, f64);
