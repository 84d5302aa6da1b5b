//! Static gitmoji data: every known glyph, its `:code:` form and the
//! changelog label the code files under.
//!
//! The table is built once on first use and never mutated. Codes missing
//! from it are not an error; the classifier files them under
//! [`CommitLabel::Miscellaneous`]. Glyphs outside the table still normalize,
//! through the general emoji shortcode set.

use crate::domain::label::CommitLabel;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Variation selector that may trail a glyph ("♻" vs "♻️").
const VS16: char = '\u{FE0F}';

/// Most chars a single emoji sequence spans (ZWJ families, tagged flags).
const MAX_SEQUENCE_CHARS: usize = 10;

/// One row of the marker table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gitmoji {
    pub glyph: &'static str,
    pub code: &'static str,
    pub label: CommitLabel,
}

const fn gm(glyph: &'static str, code: &'static str, label: CommitLabel) -> Gitmoji {
    Gitmoji { glyph, code, label }
}

use CommitLabel::*;

pub static GITMOJIS: &[Gitmoji] = &[
    gm("💥", ":boom:", BreakingChanges),
    gm("✨", ":sparkles:", Added),
    gm("🎉", ":tada:", Added),
    gm("➕", ":heavy_plus_sign:", Added),
    gm("📱", ":iphone:", Added),
    gm("🥚", ":egg:", Added),
    gm("📈", ":chart_with_upwards_trend:", Added),
    gm("🌐", ":globe_with_meridians:", Added),
    gm("💬", ":speech_balloon:", Added),
    gm("🔊", ":loud_sound:", Added),
    gm("🚩", ":triangular_flag_on_post:", Added),
    gm("🛂", ":passport_control:", Added),
    gm("🧑‍💻", ":technologist:", Added),
    gm("💸", ":money_with_wings:", Added),
    gm("🧵", ":thread:", Added),
    gm("🦺", ":safety_vest:", Added),
    gm("🩺", ":stethoscope:", Added),
    gm("🍱", ":bento:", Added),
    gm("🌱", ":seedling:", Added),
    gm("📸", ":camera_flash:", Added),
    gm("🔒️", ":lock:", Security),
    gm("🔐", ":closed_lock_with_key:", Security),
    gm("🐛", ":bug:", Fixed),
    gm("🚑️", ":ambulance:", Fixed),
    gm("💚", ":green_heart:", Fixed),
    gm("✏️", ":pencil2:", Fixed),
    gm("🚨", ":rotating_light:", Fixed),
    gm("🥅", ":goal_net:", Fixed),
    gm("🩹", ":adhesive_bandage:", Fixed),
    gm("🔥", ":fire:", Removed),
    gm("➖", ":heavy_minus_sign:", Removed),
    gm("🔇", ":mute:", Removed),
    gm("⚰️", ":coffin:", Removed),
    gm("🗑️", ":wastebasket:", Deprecated),
    gm("🎨", ":art:", Changed),
    gm("⚡️", ":zap:", Changed),
    gm("💄", ":lipstick:", Changed),
    gm("♻️", ":recycle:", Changed),
    gm("⬆️", ":arrow_up:", Changed),
    gm("⬇️", ":arrow_down:", Changed),
    gm("📌", ":pushpin:", Changed),
    gm("🔧", ":wrench:", Changed),
    gm("🚚", ":truck:", Changed),
    gm("📦️", ":package:", Changed),
    gm("👽️", ":alien:", Changed),
    gm("♿️", ":wheelchair:", Changed),
    gm("🏗️", ":building_construction:", Changed),
    gm("🏷️", ":label:", Changed),
    gm("🚸", ":children_crossing:", Changed),
    gm("🧱", ":bricks:", Changed),
    gm("👔", ":necktie:", Changed),
    gm("💫", ":dizzy:", Changed),
    gm("🔍️", ":mag:", Changed),
    gm("📄", ":page_facing_up:", Changed),
    gm("🗃️", ":card_file_box:", Changed),
    gm("🔀", ":twisted_rightwards_arrows:", Changed),
    gm("⏪️", ":rewind:", Changed),
    gm("📝", ":memo:", Miscellaneous),
    gm("🚀", ":rocket:", Miscellaneous),
    gm("✅", ":white_check_mark:", Miscellaneous),
    gm("🚧", ":construction:", Miscellaneous),
    gm("👷", ":construction_worker:", Miscellaneous),
    gm("🔨", ":hammer:", Miscellaneous),
    gm("💩", ":poop:", Miscellaneous),
    gm("🍻", ":beers:", Miscellaneous),
    gm("💡", ":bulb:", Miscellaneous),
    gm("👥", ":busts_in_silhouette:", Miscellaneous),
    gm("🤡", ":clown_face:", Miscellaneous),
    gm("🙈", ":see_no_evil:", Miscellaneous),
    gm("⚗️", ":alembic:", Miscellaneous),
    gm("🧐", ":monocle_face:", Miscellaneous),
    gm("🧪", ":test_tube:", Miscellaneous),
    gm("🔖", ":bookmark:", Release),
];

static BY_CODE: LazyLock<HashMap<&'static str, CommitLabel>> =
    LazyLock::new(|| GITMOJIS.iter().map(|g| (g.code, g.label)).collect());

/// Glyph spellings paired with their code, longest spelling first so that
/// multi-codepoint glyphs and the VS16 form win over their prefixes.
static GLYPHS: LazyLock<Vec<(String, &'static str)>> = LazyLock::new(|| {
    let mut glyphs = Vec::with_capacity(GITMOJIS.len() * 2);
    for gitmoji in GITMOJIS {
        let bare: String = gitmoji.glyph.chars().filter(|c| *c != VS16).collect();
        glyphs.push((format!("{}{}", bare, VS16), gitmoji.code));
        glyphs.push((bare, gitmoji.code));
    }
    glyphs.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    glyphs
});

/// Look up the label for a `:code:` marker, if the code is known.
pub fn lookup_code(code: &str) -> Option<CommitLabel> {
    BY_CODE.get(code).copied()
}

/// Replace every emoji glyph in `subject` with its `:code:` form.
///
/// Gitmoji glyphs take their gitmoji code; any other emoji takes its
/// common shortcode (🦀 becomes `:crab:`). Already-textual subjects come
/// back unchanged, so normalizing twice is the same as normalizing once.
pub fn normalize_subject(subject: &str) -> String {
    if subject.is_ascii() {
        return subject.to_string();
    }

    let mut normalized = subject.to_string();
    for (glyph, code) in GLYPHS.iter() {
        if normalized.contains(glyph.as_str()) {
            normalized = normalized.replace(glyph.as_str(), code);
        }
    }

    if normalized.is_ascii() {
        normalized
    } else {
        replace_other_emoji(&normalized)
    }
}

fn replace_other_emoji(text: &str) -> String {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i].1;
        if !c.is_ascii() {
            if let Some((consumed, shortcode)) = match_emoji(text, &chars, i) {
                out.push(':');
                out.push_str(shortcode);
                out.push(':');
                i += consumed;
                continue;
            }
        }
        out.push(c);
        i += 1;
    }
    out
}

/// Longest emoji sequence starting at `chars[from]`, as the number of chars
/// it covers and its shortcode
fn match_emoji(text: &str, chars: &[(usize, char)], from: usize) -> Option<(usize, &'static str)> {
    let start = chars[from].0;
    let longest = (chars.len() - from).min(MAX_SEQUENCE_CHARS);

    for len in (1..=longest).rev() {
        let end = chars.get(from + len).map_or(text.len(), |&(i, _)| i);
        let candidate = &text[start..end];
        let emoji = emojis::get(candidate).or_else(|| {
            if candidate.ends_with(VS16) {
                None
            } else {
                emojis::get(&format!("{}{}", candidate, VS16))
            }
        });

        if let Some(shortcode) = emoji.and_then(|e| e.shortcode()) {
            // A selector the lookup did not need still belongs to the glyph.
            let trailing_vs16 = chars.get(from + len).is_some_and(|&(_, c)| c == VS16);
            return Some((len + usize::from(trailing_vs16), shortcode));
        }
    }
    None
}
