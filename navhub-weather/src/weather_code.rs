//! WMO weather codes as reported by Open-Meteo, translated to Chinese.
//! See: https://open-meteo.com/en/docs#weathervariables

/// Text used for codes missing from the table.
pub const UNKNOWN_WEATHER_TEXT: &str = "未知";

/// Sorted by code; looked up with a binary search.
const WEATHER_CODES: &[(i32, &str)] = &[
    (0, "晴朗"),
    (1, "晴间多云"),
    (2, "多云"),
    (3, "阴天"),
    (45, "有雾"),
    (48, "冻雾"),
    (51, "细雨"),
    (53, "小雨"),
    (55, "中雨"),
    (56, "冻雨"),
    (57, "强冻雨"),
    (61, "小雨"),
    (63, "中雨"),
    (65, "大雨"),
    (66, "雨夹雪"),
    (67, "雨夹雪"),
    (71, "小雪"),
    (73, "中雪"),
    (75, "大雪"),
    (77, "冰雹"),
    (80, "阵雨"),
    (81, "强阵雨"),
    (82, "暴雨"),
    (85, "阵雪"),
    (86, "强阵雪"),
    (95, "雷暴"),
    (96, "雷雨"),
    (99, "强雷暴"),
];

/// Look up the description for `code`, if the table knows it.
pub fn describe(code: i32) -> Option<&'static str> {
    WEATHER_CODES
        .binary_search_by_key(&code, |(c, _)| *c)
        .ok()
        .map(|idx| WEATHER_CODES[idx].1)
}

/// Description for `code`, or [`UNKNOWN_WEATHER_TEXT`].
pub fn weather_text(code: i32) -> &'static str {
    describe(code).unwrap_or(UNKNOWN_WEATHER_TEXT)
}
