use std::collections::{BTreeMap, VecDeque};

use crate::{Glyph, GlyphStatus};

/// Largest gap that gets filled with blank glyphs when there are not enough
/// displaced glyphs to close it.
pub const GAP_FILL_LIMIT: u32 = 128;

/// Highest assignable code, `0xFFFF` marks an unassigned glyph.
const MAX_CODE: u32 = Glyph::UNASSIGNED as u32 - 1;

/// True if the glyph codes run consecutively without duplicates or unassigned entries.
pub fn check_flatness(glyphs: &[Glyph]) -> bool {
    glyphs.iter().all(|g| g.code != Glyph::UNASSIGNED) && glyphs.windows(2).all(|w| w[0].code as u32 + 1 == w[1].code as u32)
}

/// Reassigns codes so the result is a consecutive, duplicate free sequence.
///
/// For every code the first glyph in input order keeps it. Duplicates and unassigned
/// glyphs are displaced into a fill pool (status [`GlyphStatus::Error`]) which first
/// takes the codes right below the lowest kept code, then plugs gaps between kept
/// codes. Gaps the pool cannot cover are filled with blank [`GlyphStatus::Inserted`]
/// glyphs. A gap wider than [`GAP_FILL_LIMIT`] that the pool cannot cover ends gap
/// filling: that glyph and all following ones are packed down onto the next codes and
/// flagged as moved. Leftover pool glyphs go at the end.
pub fn flatten_glyph_list(glyphs: Vec<Glyph>) -> Vec<Glyph> {
    let mut groups: BTreeMap<u16, Vec<Glyph>> = BTreeMap::new();
    for glyph in glyphs {
        groups.entry(glyph.code).or_default().push(glyph);
    }

    let mut primaries = Vec::with_capacity(groups.len());
    let mut pool = VecDeque::new();
    for (code, members) in groups {
        let mut members = members.into_iter();
        if code != Glyph::UNASSIGNED {
            if let Some(primary) = members.next() {
                primaries.push(primary);
            }
        }
        pool.extend(members.map(|g| g.with_status(GlyphStatus::Error)));
    }

    let start = primaries.first().map_or(0, |g| (g.code as u32).saturating_sub(pool.len() as u32));
    let mut placed: Vec<(u32, Glyph)> = Vec::with_capacity(primaries.len() + pool.len());
    let mut cursor = start;
    let mut compress = false;

    for mut primary in primaries {
        let code = primary.code as u32;
        if !compress {
            let gap = code - cursor;
            if gap > GAP_FILL_LIMIT && gap as usize > pool.len() {
                log::warn!("gap fill limit surpassed at code 0x{code:04X} ({gap} missing codes), compressing the remaining glyphs");
                compress = true;
            } else {
                while cursor < code {
                    let filler = pool
                        .pop_front()
                        .unwrap_or_else(|| Glyph::blank(0, Glyph::INSERTED_ADVANCE, GlyphStatus::Inserted));
                    placed.push((cursor, filler));
                    cursor += 1;
                }
            }
        }
        if compress {
            primary.status = GlyphStatus::Error;
        }
        placed.push((cursor, primary));
        cursor += 1;
    }

    for glyph in pool {
        placed.push((cursor, glyph));
        cursor += 1;
    }

    assign_codes(placed, start)
}

fn assign_codes(placed: Vec<(u32, Glyph)>, start: u32) -> Vec<Glyph> {
    let last = placed.last().map_or(0, |(code, _)| *code);
    let shift = last.saturating_sub(MAX_CODE).min(start);
    if shift > 0 {
        log::warn!("code sequence runs past 0x{MAX_CODE:04X}, moving all glyphs down by {shift}");
    }

    let total = placed.len();
    let result: Vec<Glyph> = placed
        .into_iter()
        .take_while(|(code, _)| code - shift <= MAX_CODE)
        .map(|(code, mut glyph)| {
            if shift > 0 && glyph.status == GlyphStatus::Normal {
                glyph.status = GlyphStatus::Error;
            }
            glyph.with_code((code - shift) as u16)
        })
        .collect();
    if result.len() < total {
        log::warn!("dropped {} glyphs that do not fit into the code space", total - result.len());
    }
    result
}
