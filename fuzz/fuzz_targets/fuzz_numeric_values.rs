#![no_main]

use insight_statsd::MetricValue;
use libfuzzer_sys::fuzz_target;

// Fuzz target focusing on numeric edge cases
fuzz_target!(|data: &[u8]| {
    if data.len() < 16 {
        return;
    }

    let bits = u64::from_le_bytes([
        data[0], data[1], data[2], data[3],
        data[4], data[5], data[6], data[7],
    ]);
    let integer = i64::from_le_bytes([
        data[8], data[9], data[10], data[11],
        data[12], data[13], data[14], data[15],
    ]);

    let float = f64::from_bits(bits);
    let rendered = MetricValue::from(float).to_string();
    if float.is_nan() {
        assert_eq!(rendered, "NaN");
    } else if float.is_infinite() {
        assert!(rendered == "Infinity" || rendered == "-Infinity");
    } else {
        assert!(!rendered.contains(','), "grouping separator in {rendered}");
        assert!(!rendered.contains(['e', 'E']), "exponent in {rendered}");
        if let Some((_, fraction)) = rendered.split_once('.') {
            assert!(fraction.len() <= 6, "too many fraction digits in {rendered}");
            assert!(!fraction.ends_with('0'), "trailing zero in {rendered}");
        }
    }

    assert_eq!(MetricValue::from(integer).to_string(), integer.to_string());
    assert_eq!(MetricValue::from(bits).to_string(), bits.to_string());
});
