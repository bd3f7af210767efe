//! Script subsets used for webfont `unicode-range` splitting.
//!
//! Ranges follow the subsets Google Fonts serves, so a browser downloads
//! only the files for the scripts a page actually uses.

use std::{collections::BTreeSet, fmt};

/// A named script subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Script {
    Arabic,
    Bengali,
    Cyrillic,
    CyrillicExt,
    Devanagari,
    Georgian,
    Greek,
    GreekExt,
    Gujarati,
    Gurmukhi,
    Hebrew,
    Kannada,
    Khmer,
    Latin,
    LatinExt,
    Malayalam,
    Myanmar,
    Oriya,
    Sinhala,
    Tamil,
    Telugu,
    Thai,
    Tibetan,
    Vietnamese,
}

impl Script {
    pub const ALL: [Script; 24] = [
        Script::Arabic,
        Script::Bengali,
        Script::Cyrillic,
        Script::CyrillicExt,
        Script::Devanagari,
        Script::Georgian,
        Script::Greek,
        Script::GreekExt,
        Script::Gujarati,
        Script::Gurmukhi,
        Script::Hebrew,
        Script::Kannada,
        Script::Khmer,
        Script::Latin,
        Script::LatinExt,
        Script::Malayalam,
        Script::Myanmar,
        Script::Oriya,
        Script::Sinhala,
        Script::Tamil,
        Script::Telugu,
        Script::Thai,
        Script::Tibetan,
        Script::Vietnamese,
    ];

    /// Name used in subset file names (`Font-Regular.latin-ext.woff2`).
    pub fn as_str(self) -> &'static str {
        match self {
            Script::Arabic => "arabic",
            Script::Bengali => "bengali",
            Script::Cyrillic => "cyrillic",
            Script::CyrillicExt => "cyrillic-ext",
            Script::Devanagari => "devanagari",
            Script::Georgian => "georgian",
            Script::Greek => "greek",
            Script::GreekExt => "greek-ext",
            Script::Gujarati => "gujarati",
            Script::Gurmukhi => "gurmukhi",
            Script::Hebrew => "hebrew",
            Script::Kannada => "kannada",
            Script::Khmer => "khmer",
            Script::Latin => "latin",
            Script::LatinExt => "latin-ext",
            Script::Malayalam => "malayalam",
            Script::Myanmar => "myanmar",
            Script::Oriya => "oriya",
            Script::Sinhala => "sinhala",
            Script::Tamil => "tamil",
            Script::Telugu => "telugu",
            Script::Thai => "thai",
            Script::Tibetan => "tibetan",
            Script::Vietnamese => "vietnamese",
        }
    }

    /// Inclusive `(start, end)` codepoint ranges of this subset.
    pub fn ranges(self) -> &'static [(u32, u32)] {
        match self {
            Script::Arabic => &[
                (0x0600, 0x06FF),
                (0x200C, 0x200E),
                (0x2010, 0x2011),
                (0x204F, 0x204F),
                (0x2E41, 0x2E41),
                (0xFB50, 0xFDFF),
                (0xFE80, 0xFEFC),
            ],
            Script::Bengali => &[
                (0x0964, 0x0965),
                (0x0981, 0x09FB),
                (0x200C, 0x200D),
                (0x20B9, 0x20B9),
                (0x25CC, 0x25CC),
            ],
            Script::Cyrillic => &[
                (0x0400, 0x045F),
                (0x0490, 0x0491),
                (0x04B0, 0x04B1),
                (0x2116, 0x2116),
            ],
            Script::CyrillicExt => &[
                (0x0460, 0x052F),
                (0x1C80, 0x1C88),
                (0x20B4, 0x20B4),
                (0x2DE0, 0x2DFF),
                (0xA640, 0xA69F),
                (0xFE2E, 0xFE2F),
            ],
            Script::Devanagari => &[
                (0x0900, 0x097F),
                (0x1CD0, 0x1CF6),
                (0x1CF8, 0x1CF9),
                (0x200C, 0x200D),
                (0x20A8, 0x20A8),
                (0x20B9, 0x20B9),
                (0x25CC, 0x25CC),
                (0xA830, 0xA839),
                (0xA8E0, 0xA8FB),
            ],
            Script::Georgian => &[(0x10A0, 0x10FF)],
            Script::Greek => &[(0x0370, 0x03FF)],
            Script::GreekExt => &[(0x1F00, 0x1FFF)],
            Script::Gujarati => &[
                (0x0964, 0x0965),
                (0x0A80, 0x0AFF),
                (0x200C, 0x200D),
                (0x20B9, 0x20B9),
                (0x25CC, 0x25CC),
                (0xA830, 0xA839),
            ],
            Script::Gurmukhi => &[
                (0x0964, 0x0965),
                (0x0A01, 0x0A75),
                (0x200C, 0x200D),
                (0x20B9, 0x20B9),
                (0x25CC, 0x25CC),
                (0x262C, 0x262C),
                (0xA830, 0xA839),
            ],
            Script::Hebrew => &[
                (0x0590, 0x05FF),
                (0x20AA, 0x20AA),
                (0x25CC, 0x25CC),
                (0xFB1D, 0xFB4F),
            ],
            Script::Kannada => &[
                (0x0964, 0x0965),
                (0x0C82, 0x0CF2),
                (0x200C, 0x200D),
                (0x20B9, 0x20B9),
                (0x25CC, 0x25CC),
            ],
            Script::Khmer => &[(0x1780, 0x17FF), (0x200C, 0x200C), (0x25CC, 0x25CC)],
            Script::Latin => &[
                (0x0000, 0x00FF),
                (0x0131, 0x0131),
                (0x0152, 0x0153),
                (0x02BB, 0x02BC),
                (0x02C6, 0x02C6),
                (0x02DA, 0x02DA),
                (0x02DC, 0x02DC),
                (0x2000, 0x206F),
                (0x2074, 0x2074),
                (0x20AC, 0x20AC),
                (0x2122, 0x2122),
                (0x2191, 0x2191),
                (0x2193, 0x2193),
                (0x2212, 0x2212),
                (0x2215, 0x2215),
                (0xFEFF, 0xFEFF),
                (0xFFFD, 0xFFFD),
            ],
            Script::LatinExt => &[
                (0x0100, 0x024F),
                (0x0259, 0x0259),
                (0x1E00, 0x1EFF),
                (0x2020, 0x2020),
                (0x20A0, 0x20AB),
                (0x20AD, 0x20CF),
                (0x2113, 0x2113),
                (0x2C60, 0x2C7F),
                (0xA720, 0xA7FF),
            ],
            Script::Malayalam => &[
                (0x0307, 0x0307),
                (0x0323, 0x0323),
                (0x0964, 0x0965),
                (0x0D02, 0x0D7F),
                (0x200C, 0x200D),
                (0x20B9, 0x20B9),
                (0x25CC, 0x25CC),
            ],
            Script::Myanmar => &[(0x1000, 0x109F), (0x200C, 0x200D), (0x25CC, 0x25CC)],
            Script::Oriya => &[
                (0x0964, 0x0965),
                (0x0B01, 0x0B77),
                (0x200C, 0x200D),
                (0x20B9, 0x20B9),
                (0x25CC, 0x25CC),
            ],
            Script::Sinhala => &[
                (0x0964, 0x0965),
                (0x0D82, 0x0DF4),
                (0x200C, 0x200D),
                (0x25CC, 0x25CC),
            ],
            Script::Tamil => &[
                (0x0964, 0x0965),
                (0x0B82, 0x0BFA),
                (0x200C, 0x200D),
                (0x20B9, 0x20B9),
                (0x25CC, 0x25CC),
            ],
            Script::Telugu => &[
                (0x0951, 0x0952),
                (0x0964, 0x0965),
                (0x0C00, 0x0C7F),
                (0x1CDA, 0x1CDA),
                (0x200C, 0x200D),
                (0x25CC, 0x25CC),
            ],
            Script::Thai => &[(0x0E01, 0x0E5B), (0x200C, 0x200D), (0x25CC, 0x25CC)],
            Script::Tibetan => &[(0x0F00, 0x0FFF), (0x200C, 0x200D), (0x25CC, 0x25CC)],
            Script::Vietnamese => &[
                (0x0102, 0x0103),
                (0x0110, 0x0111),
                (0x1EA0, 0x1EF9),
                (0x20AB, 0x20AB),
            ],
        }
    }

    pub fn contains(self, cp: u32) -> bool {
        self.ranges().iter().any(|&(start, end)| (start..=end).contains(&cp))
    }

    /// Codepoints of `available` that fall inside this subset.
    pub fn intersect(self, available: &BTreeSet<u32>) -> BTreeSet<u32> {
        available.iter().copied().filter(|cp| self.contains(*cp)).collect()
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_scripts_have_ranges() {
        for script in Script::ALL {
            assert!(!script.ranges().is_empty(), "{script} has no ranges");
            for (start, end) in script.ranges() {
                assert!(start <= end, "{script}: {start:#X} > {end:#X}");
            }
        }
    }

    #[test]
    fn test_names_are_unique() {
        let names: BTreeSet<_> = Script::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(names.len(), Script::ALL.len());
    }

    #[test]
    fn test_intersect_latin() {
        let available: BTreeSet<u32> = [0x41, 0x42, 0x0410, 0x2122].into_iter().collect();
        let latin = Script::Latin.intersect(&available);
        assert_eq!(latin.into_iter().collect::<Vec<_>>(), [0x41, 0x42, 0x2122]);

        let cyrillic = Script::Cyrillic.intersect(&available);
        assert_eq!(cyrillic.into_iter().collect::<Vec<_>>(), [0x0410]);
    }
}
