//! Fixed 3x5 digit glyph catalog for score recognition.

pub const GLYPH_COLS: usize = 3;
pub const GLYPH_ROWS: usize = 5;

/// Fraction of matching cells a template must reach before its digit is
/// accepted. Glyphs scoring at or below the bar are dropped, never
/// substituted with a placeholder digit.
pub const MATCH_BAR: f32 = 0.6;

/// Row-major binary cell grid, rows top to bottom.
pub type GlyphPattern = [[u8; GLYPH_COLS]; GLYPH_ROWS];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitTemplate {
    pub digit: char,
    pub pattern: GlyphPattern,
}

/// Static catalog, one template per digit, immutable for the process
/// lifetime.
pub const DIGIT_TEMPLATES: [DigitTemplate; 10] = [
    DigitTemplate {
        digit: '0',
        pattern: [[1, 1, 1], [1, 0, 1], [1, 0, 1], [1, 0, 1], [1, 1, 1]],
    },
    DigitTemplate {
        digit: '1',
        pattern: [[0, 1, 0], [1, 1, 0], [0, 1, 0], [0, 1, 0], [1, 1, 1]],
    },
    DigitTemplate {
        digit: '2',
        pattern: [[1, 1, 1], [0, 0, 1], [1, 1, 1], [1, 0, 0], [1, 1, 1]],
    },
    DigitTemplate {
        digit: '3',
        pattern: [[1, 1, 1], [0, 0, 1], [0, 1, 1], [0, 0, 1], [1, 1, 1]],
    },
    DigitTemplate {
        digit: '4',
        pattern: [[1, 0, 1], [1, 0, 1], [1, 1, 1], [0, 0, 1], [0, 0, 1]],
    },
    DigitTemplate {
        digit: '5',
        pattern: [[1, 1, 1], [1, 0, 0], [1, 1, 1], [0, 0, 1], [1, 1, 0]],
    },
    DigitTemplate {
        digit: '6',
        pattern: [[1, 1, 1], [1, 0, 0], [1, 1, 1], [1, 0, 1], [1, 1, 1]],
    },
    DigitTemplate {
        digit: '7',
        pattern: [[1, 1, 1], [0, 0, 1], [0, 0, 1], [0, 1, 0], [0, 1, 0]],
    },
    DigitTemplate {
        digit: '8',
        pattern: [[1, 1, 1], [1, 0, 1], [1, 1, 1], [1, 0, 1], [1, 1, 1]],
    },
    DigitTemplate {
        digit: '9',
        pattern: [[1, 1, 1], [1, 0, 1], [1, 1, 1], [0, 0, 1], [1, 1, 1]],
    },
];

/// Fraction of cells on which the two patterns agree, in [0, 1].
pub fn match_score(a: &GlyphPattern, b: &GlyphPattern) -> f32 {
    let mut hits = 0usize;
    for row in 0..GLYPH_ROWS {
        for col in 0..GLYPH_COLS {
            if (a[row][col] != 0) == (b[row][col] != 0) {
                hits += 1;
            }
        }
    }
    hits as f32 / (GLYPH_ROWS * GLYPH_COLS) as f32
}

/// Classify a pattern against the catalog. The best-scoring template wins,
/// but only when its score exceeds `bar`.
pub fn classify(pattern: &GlyphPattern, bar: f32) -> Option<char> {
    let mut best: Option<(char, f32)> = None;

    for template in &DIGIT_TEMPLATES {
        let score = match_score(pattern, &template.pattern);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((template.digit, score));
        }
    }

    best.and_then(|(digit, score)| if score > bar { Some(digit) } else { None })
}
