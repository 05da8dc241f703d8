//! Tablica podmian znaków (leet / homoglify) dla każdej litery a–z.
//!
//! Sama polityka podmian jest danymi – kompilator reguł tylko ją czyta.

/// Separatory, którymi ludzie "rozbijają" słowa: `f u c k`, `f.u.c.k`, `f_u-c*k`.
pub const SEPARATORS: &str = r#"[\s*.\-_()'"]*"#;

/// Uproszczone separatory dla reguły awaryjnej (literalnej).
pub const LITERAL_SEPARATORS: &str = r"[\s*.\-_]*";

/// litera → znaki uznawane za tę literę (łącznie z nią samą)
pub static LOOKALIKES: &[(char, &str)] = &[
    ('a', "a@4àáâäãåą∆Д"),
    ('b', "b8ßвь"),
    ('c', "c¢çćčс©"),
    ('d', "dđďð"),
    ('e', "e3èéêëęėξεЕ€"),
    ('f', "fƒ"),
    ('g', "g6ğģ9"),
    ('h', "hħнΗ"),
    ('i', "i1!¡íìîïįιΙ"),
    ('j', "jјĵ"),
    ('k', "kķĸκк"),
    ('l', "l1|!łлιL£"),
    ('m', "mмΜ"),
    ('n', "nñнηИΝЛ"),
    ('o', "o0òóôõöøөΟο☺☻⚪⚫"),
    ('p', "pрρРπп♀"),
    ('q', "q9"),
    ('r', "rгř®яЯ"),
    ('s', "s5$śšşѕ"),
    ('t', "t7+тτТ†‡"),
    ('u', "uüúùûụųμυµ"),
    ('v', "v/υν♈"),
    ('w', "wшщẁẃẅω"),
    ('x', "x×хж✗✘χ"),
    ('y', "yýÿчụγ¥λΥ"),
    ('z', "zžżźзж2"),
];

pub fn lookalikes(ch: char) -> Option<&'static str> {
    LOOKALIKES
        .iter()
        .find(|(letter, _)| *letter == ch)
        .map(|(_, set)| *set)
}

/// Klasa znaków `[...]` dla jednego znaku terminu (bez kwantyfikatora).
pub fn char_class(ch: char) -> String {
    let mut out = String::from("[");
    match lookalikes(ch) {
        Some(set) => {
            for c in set.chars() {
                push_escaped(&mut out, c);
            }
        }
        None => push_escaped(&mut out, ch),
    }
    out.push(']');
    out
}

pub fn push_escaped(out: &mut String, ch: char) {
    let mut buf = [0u8; 4];
    out.push_str(&regex::escape(ch.encode_utf8(&mut buf)));
}
