//! German-locale string ordering for company names.
//!
//! Letters compare by base letter first (`Ä` sorts with `A`, `ß` as `ss`,
//! case ignored), then accents, then case with lowercase first. Only
//! strings that are identical compare equal, so a stable sort keeps input
//! order for exact duplicates.

use std::cmp::Ordering;

fn push_base(ch: char, out: &mut String) {
    let base = match ch {
        'ä' | 'à' | 'á' | 'â' | 'ã' | 'å' | 'ā' => 'a',
        'ç' | 'č' | 'ć' => 'c',
        'é' | 'è' | 'ê' | 'ë' | 'ē' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ñ' | 'ń' => 'n',
        'ö' | 'ò' | 'ó' | 'ô' | 'õ' | 'ø' | 'ō' => 'o',
        'š' | 'ś' => 's',
        'ü' | 'ù' | 'ú' | 'û' | 'ū' => 'u',
        'ý' | 'ÿ' => 'y',
        'ž' | 'ź' | 'ż' => 'z',
        'ß' => {
            out.push_str("ss");
            return;
        }
        other => other,
    };
    out.push(base);
}

/// Primary sort key: lowercase with diacritics folded away.
pub fn fold_key(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars().flat_map(char::to_lowercase) {
        push_base(ch, &mut out);
    }
    out
}

fn compare_case(a: &str, b: &str) -> Ordering {
    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca == cb {
            continue;
        }
        match (ca.is_lowercase(), cb.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => return ca.cmp(&cb),
        }
    }
    a.chars().count().cmp(&b.chars().count())
}

pub fn compare(a: &str, b: &str) -> Ordering {
    fold_key(a)
        .cmp(&fold_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| compare_case(a, b))
}
