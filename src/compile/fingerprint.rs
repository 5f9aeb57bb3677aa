use crate::filter::applied::AppliedFilterSet;
use crate::foundation::color::Rgba8;
use crate::foundation::math::Fnv1a64;
use crate::sticker::model::Sticker;

const SEED_B: u64 = 0x9ae1_6a3b_2f90_404f;

/// 128-bit digest of a photo's edit state (filters, stickers, frame color).
///
/// A processed bitmap is stamped with the fingerprint of the edits it was rendered from, so a
/// stale bitmap can be detected by comparing digests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct EditFingerprint {
    /// First FNV-1a lane.
    pub hi: u64,
    /// Second FNV-1a lane.
    pub lo: u64,
}

/// Digest the edit inputs of a photo.
pub fn fingerprint_edits(
    filters: &AppliedFilterSet,
    stickers: &[Sticker],
    frame_color: Option<Rgba8>,
) -> EditFingerprint {
    let mut a = Fnv1a64::new(Fnv1a64::OFFSET_BASIS);
    let mut b = Fnv1a64::new(SEED_B);

    let basic: Vec<_> = filters.basic().collect();
    write_u64_pair(&mut a, &mut b, basic.len() as u64);
    for f in basic {
        write_str_pair(&mut a, &mut b, f.name());
    }
    let advanced: Vec<_> = filters.advanced().collect();
    write_u64_pair(&mut a, &mut b, advanced.len() as u64);
    for (f, v) in advanced {
        write_str_pair(&mut a, &mut b, f.name());
        write_u64_pair(&mut a, &mut b, v.to_bits());
    }

    write_u64_pair(&mut a, &mut b, stickers.len() as u64);
    for s in stickers {
        write_str_pair(&mut a, &mut b, s.id.as_str());
        write_str_pair(&mut a, &mut b, &s.src);
        for v in [s.x, s.y, s.width, s.height, s.rotation_deg] {
            write_u64_pair(&mut a, &mut b, v.to_bits());
        }
        write_u64_pair(&mut a, &mut b, i64::from(s.z_index) as u64);
    }

    match frame_color {
        Some(c) => {
            write_u8_pair(&mut a, &mut b, 1);
            for v in [c.r, c.g, c.b, c.a] {
                write_u8_pair(&mut a, &mut b, v);
            }
        }
        None => write_u8_pair(&mut a, &mut b, 0),
    }

    EditFingerprint {
        hi: a.finish(),
        lo: b.finish(),
    }
}

fn write_u8_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u8) {
    a.write_u8(v);
    b.write_u8(v);
}

fn write_u64_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u64) {
    a.write_u64(v);
    b.write_u64(v);
}

fn write_str_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, s: &str) {
    write_u64_pair(a, b, s.len() as u64);
    a.write_bytes(s.as_bytes());
    b.write_bytes(s.as_bytes());
}

#[cfg(test)]
#[path = "../../tests/unit/compile/fingerprint.rs"]
mod tests;
