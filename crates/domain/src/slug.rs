//! 标题到 URL slug 的确定性转换。

// 已知变音字符到 ASCII 基字符的显式映射表。
// 输入先做小写化，所以这里只需覆盖小写形式
// (土耳其语 İ 小写后是 i + U+0307，组合点会在过滤阶段被丢弃)。
const TRANSLIT: &[(char, &str)] = &[
    ('à', "a"), ('á', "a"), ('â', "a"), ('ä', "a"), ('ã', "a"), ('å', "a"),
    ('æ', "ae"), ('ç', "c"), ('è', "e"), ('é', "e"), ('ê', "e"), ('ë', "e"),
    ('ğ', "g"), ('ì', "i"), ('í', "i"), ('î', "i"), ('ï', "i"), ('ı', "i"),
    ('ñ', "n"), ('ò', "o"), ('ó', "o"), ('ô', "o"), ('ö', "o"), ('õ', "o"),
    ('ø', "o"), ('œ', "oe"), ('ş', "s"), ('ß', "ss"), ('ù', "u"), ('ú', "u"),
    ('û', "u"), ('ü', "u"), ('ý', "y"), ('ÿ', "y"),
];

fn transliterate(c: char) -> Option<&'static str> {
    TRANSLIT.iter().find(|(k, _)| *k == c).map(|(_, v)| *v)
}

/// 小写化、变音转写、剔除非 [a-z0-9-] 字符、空白与连字符折叠为单个 '-'、
/// 去除首尾连字符。空输入产出空字符串。幂等。
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_sep = false;

    let mut push = |out: &mut String, pending: &mut bool, c: char| {
        if *pending && !out.is_empty() {
            out.push('-');
        }
        *pending = false;
        out.push(c);
    };

    for c in title.chars().flat_map(|c| c.to_lowercase()) {
        if let Some(mapped) = transliterate(c) {
            for m in mapped.chars() {
                push(&mut out, &mut pending_sep, m);
            }
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            push(&mut out, &mut pending_sep, c);
        } else if c.is_whitespace() || c == '-' {
            pending_sep = true;
        }
        // 其余字符一律丢弃
    }

    out
}

/// 追加一段由时钟值派生的去重后缀：取单调递增时钟的末 6 位数字。
/// 调用方传入 `Utc::now().timestamp_micros()` 一类的值；只装饰一次，不循环探测。
pub fn decorate(candidate: &str, clock: i64) -> String {
    format!("{}-{:06}", candidate, clock.rem_euclid(1_000_000))
}
