//! Key name ↔ evdev key code lookup.
//!
//! Config files refer to keys by short names (`"Z"`, `"Esc"`, `"Left"`).
//! Names are case-insensitive and a handful of common aliases are accepted.
//! A decimal string that is not a name (`"44"`, but not `"1"`, which is the
//! digit key) is taken as a raw Linux key code. In TOML a raw code is best
//! written as an integer (`key = 28`), which never goes through name lookup.

use evdev::Key;

/// Canonical key names, in the order they are listed to the user.
#[rustfmt::skip]
const KEY_NAMES: &[(&str, Key)] = &[
    ("A", Key::KEY_A), ("B", Key::KEY_B), ("C", Key::KEY_C), ("D", Key::KEY_D),
    ("E", Key::KEY_E), ("F", Key::KEY_F), ("G", Key::KEY_G), ("H", Key::KEY_H),
    ("I", Key::KEY_I), ("J", Key::KEY_J), ("K", Key::KEY_K), ("L", Key::KEY_L),
    ("M", Key::KEY_M), ("N", Key::KEY_N), ("O", Key::KEY_O), ("P", Key::KEY_P),
    ("Q", Key::KEY_Q), ("R", Key::KEY_R), ("S", Key::KEY_S), ("T", Key::KEY_T),
    ("U", Key::KEY_U), ("V", Key::KEY_V), ("W", Key::KEY_W), ("X", Key::KEY_X),
    ("Y", Key::KEY_Y), ("Z", Key::KEY_Z),
    ("1", Key::KEY_1), ("2", Key::KEY_2), ("3", Key::KEY_3), ("4", Key::KEY_4),
    ("5", Key::KEY_5), ("6", Key::KEY_6), ("7", Key::KEY_7), ("8", Key::KEY_8),
    ("9", Key::KEY_9), ("0", Key::KEY_0),
    ("Esc", Key::KEY_ESC), ("Enter", Key::KEY_ENTER), ("Space", Key::KEY_SPACE),
    ("Tab", Key::KEY_TAB), ("Bksp", Key::KEY_BACKSPACE), ("Caps", Key::KEY_CAPSLOCK),
    ("-", Key::KEY_MINUS), ("=", Key::KEY_EQUAL), ("[", Key::KEY_LEFTBRACE),
    ("]", Key::KEY_RIGHTBRACE), ("\\", Key::KEY_BACKSLASH), (";", Key::KEY_SEMICOLON),
    ("'", Key::KEY_APOSTROPHE), ("`", Key::KEY_GRAVE), (",", Key::KEY_COMMA),
    (".", Key::KEY_DOT), ("/", Key::KEY_SLASH),
    ("F1", Key::KEY_F1), ("F2", Key::KEY_F2), ("F3", Key::KEY_F3), ("F4", Key::KEY_F4),
    ("F5", Key::KEY_F5), ("F6", Key::KEY_F6), ("F7", Key::KEY_F7), ("F8", Key::KEY_F8),
    ("F9", Key::KEY_F9), ("F10", Key::KEY_F10), ("F11", Key::KEY_F11), ("F12", Key::KEY_F12),
    ("Left", Key::KEY_LEFT), ("Right", Key::KEY_RIGHT), ("Up", Key::KEY_UP),
    ("Down", Key::KEY_DOWN),
    ("Ins", Key::KEY_INSERT), ("Del", Key::KEY_DELETE), ("Home", Key::KEY_HOME),
    ("End", Key::KEY_END), ("PgUp", Key::KEY_PAGEUP), ("PgDn", Key::KEY_PAGEDOWN),
    ("LShift", Key::KEY_LEFTSHIFT), ("RShift", Key::KEY_RIGHTSHIFT),
    ("LCtrl", Key::KEY_LEFTCTRL), ("RCtrl", Key::KEY_RIGHTCTRL),
    ("LAlt", Key::KEY_LEFTALT), ("RAlt", Key::KEY_RIGHTALT),
    ("LMeta", Key::KEY_LEFTMETA), ("RMeta", Key::KEY_RIGHTMETA),
    ("KP0", Key::KEY_KP0), ("KP1", Key::KEY_KP1), ("KP2", Key::KEY_KP2),
    ("KP3", Key::KEY_KP3), ("KP4", Key::KEY_KP4), ("KP5", Key::KEY_KP5),
    ("KP6", Key::KEY_KP6), ("KP7", Key::KEY_KP7), ("KP8", Key::KEY_KP8),
    ("KP9", Key::KEY_KP9), ("KPEnter", Key::KEY_KPENTER),
];

/// Map an alias onto its canonical name, or return `None` if `lower` is not an alias.
fn alias(lower: &str) -> Option<&'static str> {
    let canonical = match lower {
        "escape" => "Esc",
        "return" | "ret" => "Enter",
        "spacebar" | "spc" => "Space",
        "backspace" | "bs" => "Bksp",
        "capslock" => "Caps",
        "minus" => "-",
        "equal" | "equals" => "=",
        "leftbracket" | "lbracket" => "[",
        "rightbracket" | "rbracket" => "]",
        "backslash" => "\\",
        "semicolon" => ";",
        "apostrophe" | "quote" => "'",
        "grave" | "backtick" => "`",
        "comma" => ",",
        "period" | "dot" => ".",
        "slash" => "/",
        "leftarrow" => "Left",
        "rightarrow" => "Right",
        "uparrow" => "Up",
        "downarrow" => "Down",
        "insert" => "Ins",
        "delete" => "Del",
        "pageup" => "PgUp",
        "pagedown" | "pgdown" => "PgDn",
        "leftshift" | "shift" => "LShift",
        "rightshift" => "RShift",
        "leftctrl" | "ctrl" | "control" => "LCtrl",
        "rightctrl" => "RCtrl",
        "leftalt" | "alt" => "LAlt",
        "rightalt" | "altgr" => "RAlt",
        "leftmeta" | "super" | "meta" | "win" => "LMeta",
        "rightmeta" => "RMeta",
        _ => return None,
    };
    Some(canonical)
}

/// Resolve a key name to an evdev key, falling back to a raw decimal code.
///
/// Names win: `"1"` is `KEY_1`, not raw code 1 (`KEY_ESC`).
pub fn key_from_name(name: &str) -> Option<Key> {
    let name = name.trim();
    let lower = name.to_ascii_lowercase();
    let search = alias(&lower).unwrap_or(name);

    if let Some(&(_, key)) = KEY_NAMES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(search))
    {
        return Some(key);
    }

    name.parse::<u16>().ok().map(Key::new)
}

/// Short display name for a key; falls back to the decimal code for unnamed keys.
pub fn key_name(key: Key) -> String {
    KEY_NAMES
        .iter()
        .find(|(_, k)| *k == key)
        .map(|(n, _)| (*n).to_string())
        .unwrap_or_else(|| key.code().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_resolve() {
        assert_eq!(key_from_name("Z"), Some(Key::KEY_Z));
        assert_eq!(key_from_name("Esc"), Some(Key::KEY_ESC));
        assert_eq!(key_from_name("Left"), Some(Key::KEY_LEFT));
        assert_eq!(key_from_name("F12"), Some(Key::KEY_F12));
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(key_from_name("z"), Some(Key::KEY_Z));
        assert_eq!(key_from_name("ESC"), Some(Key::KEY_ESC));
        assert_eq!(key_from_name("pgup"), Some(Key::KEY_PAGEUP));
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!(key_from_name("Escape"), Some(Key::KEY_ESC));
        assert_eq!(key_from_name("return"), Some(Key::KEY_ENTER));
        assert_eq!(key_from_name("Backspace"), Some(Key::KEY_BACKSPACE));
        assert_eq!(key_from_name("UpArrow"), Some(Key::KEY_UP));
    }

    #[test]
    fn raw_code_fallback() {
        // 44 is KEY_Z in the Linux input code space
        assert_eq!(key_from_name("44"), Some(Key::KEY_Z));
    }

    #[test]
    fn digit_names_win_over_raw_codes() {
        assert_eq!(key_from_name("1"), Some(Key::KEY_1));
        assert_eq!(key_from_name("0"), Some(Key::KEY_0));
        assert_ne!(key_from_name("1"), Some(Key::new(1)));
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(key_from_name("NotAKey"), None);
        assert_eq!(key_from_name(""), None);
    }

    #[test]
    fn display_names() {
        assert_eq!(key_name(Key::KEY_Z), "Z");
        assert_eq!(key_name(Key::KEY_ESC), "Esc");
        assert_eq!(key_name(Key::new(0x2ff)), "767");
    }

    #[test]
    fn table_has_unique_names_and_keys() {
        for (i, (name, key)) in KEY_NAMES.iter().enumerate() {
            for (other_name, other_key) in &KEY_NAMES[i + 1..] {
                assert!(!name.eq_ignore_ascii_case(other_name), "dup name {name}");
                assert_ne!(key, other_key, "dup key for {name}");
            }
        }
    }
}
