//! 数值和文本的显示格式

/// 订阅数隐藏时的占位文字
pub const HIDDEN: &str = "Hidden";
/// 截断标记
pub const ELLIPSIS: &str = "...";

/// 千位分组: 1234567 -> "1,234,567"
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// 可能缺失的计数（如被隐藏的订阅数）
pub fn format_optional_count(n: Option<u64>) -> String {
    n.map(format_count).unwrap_or_else(|| HIDDEN.to_string())
}

/// 百分比保留两位小数: 4.1 -> "4.10%"
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// 离群分数保留一位小数: 2.345 -> "2.3x"
pub fn format_outlier(score: f64) -> String {
    format!("{score:.1}x")
}

/// 按字符预算截断
///
/// 超出预算时结果恰好是 `budget` 个字符（含省略号）；未超出时原样返回。
pub fn truncate(text: &str, budget: usize) -> String {
    let len = text.chars().count();
    if len <= budget {
        return text.to_string();
    }
    let marker_len = ELLIPSIS.chars().count();
    if budget <= marker_len {
        return ELLIPSIS.chars().take(budget).collect();
    }
    text.chars().take(budget - marker_len).collect::<String>() + ELLIPSIS
}

/// 远端 API 的文本下标按 UTF-16 计
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
        assert_eq!(format_count(20_800_000), "20,800,000");
    }

    #[test]
    fn test_hidden_count() {
        assert_eq!(format_optional_count(None), "Hidden");
        assert_eq!(format_optional_count(Some(15300)), "15,300");
    }

    #[test]
    fn test_percent_and_outlier() {
        assert_eq!(format_percent(4.1), "4.10%");
        assert_eq!(format_percent(0.0), "0.00%");
        assert_eq!(format_outlier(2.345), "2.3x");
        assert_eq!(format_outlier(10.0), "10.0x");
    }

    #[test]
    fn test_truncate_exact_budget() {
        let title = "a".repeat(80);
        let out = truncate(&title, 50);
        assert_eq!(out.chars().count(), 50);
        assert!(out.ends_with("..."));

        let short = "short title";
        assert_eq!(truncate(short, 50), short);

        let exact = "b".repeat(50);
        assert_eq!(truncate(&exact, 50), exact);
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let title = "数据分析".repeat(20);
        let out = truncate(&title, 10);
        assert_eq!(out.chars().count(), 10);
        assert_eq!(out, "数据分析数据分...");
    }

    #[test]
    fn test_utf16_len() {
        assert_eq!(utf16_len("• a"), 3);
        assert_eq!(utf16_len("😀"), 2);
    }
}
