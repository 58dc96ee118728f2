use std::fmt;

const WORD_BITS: usize = 64;

/// Pixel-exact opacity bitmap of one sprite frame.
///
/// Each row is stored as a run of `u64` words, where bit `x % 64` of word `x / 64`
/// represents column `x`. Bits past `width` are always zero, so whole words can be
/// compared without masking.
///
/// # Overlap test
///
/// [`overlaps`](Self::overlaps) places the other mask's origin at an offset in this
/// mask's coordinate space and reports whether any pixel is opaque in both:
///
/// ```text
///  self (origin 0,0)          other placed at (dx, dy)
///  . . # # . .
///  . # # # # .                 # # #
///  . . # # . .       dx=3 ->   # # #     overlap at (3,1), (4,1), (3,2)
/// ```
///
/// Two masks whose bounding boxes intersect are not reported as overlapping unless
/// an opaque pixel coincides.
///
/// # Example
///
/// ```
/// use flappy_engine::OpacityMask;
///
/// let a = OpacityMask::from_ascii("#.\n..");
/// let b = OpacityMask::from_ascii(".#\n##");
///
/// assert!(!a.overlaps(&b, (0, 0)));
/// assert!(a.overlaps(&b, (-1, 0)));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct OpacityMask {
    width: usize,
    height: usize,
    words_per_row: usize,
    words: Vec<u64>,
}

impl fmt::Debug for OpacityMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpacityMask")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("opaque", &self.count_opaque())
            .finish_non_exhaustive()
    }
}

impl OpacityMask {
    /// Creates a fully transparent mask.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        let words_per_row = width.div_ceil(WORD_BITS);
        Self {
            width,
            height,
            words_per_row,
            words: vec![0; words_per_row * height],
        }
    }

    /// Creates a mask where pixel `(x, y)` is opaque iff `f(x, y)` returns true.
    #[must_use]
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> bool,
    {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if f(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Parses a mask from text art, `#` being opaque.
    ///
    /// The width is the length of the longest line.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let rows = art.lines().map(str::as_bytes).collect::<Vec<_>>();
        let width = rows.iter().map(|row| row.len()).max().unwrap_or(0);
        Self::from_fn(width, rows.len(), |x, y| rows[y].get(x) == Some(&b'#'))
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns whether pixel `(x, y)` is opaque. Out-of-range pixels are transparent.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let word = self.row(y)[x / WORD_BITS];
        word & (1 << (x % WORD_BITS)) != 0
    }

    /// Sets the opacity of pixel `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the pixel is outside the mask.
    pub fn set(&mut self, x: usize, y: usize, opaque: bool) {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} mask",
            self.width,
            self.height
        );
        let index = y * self.words_per_row + x / WORD_BITS;
        let bit = 1 << (x % WORD_BITS);
        if opaque {
            self.words[index] |= bit;
        } else {
            self.words[index] &= !bit;
        }
    }

    /// Number of opaque pixels.
    #[must_use]
    pub fn count_opaque(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns a copy of this mask mirrored top to bottom.
    #[must_use]
    pub fn flipped_vertically(&self) -> Self {
        let mut words = Vec::with_capacity(self.words.len());
        for y in (0..self.height).rev() {
            words.extend_from_slice(self.row(y));
        }
        Self { words, ..*self }
    }

    fn row(&self, y: usize) -> &[u64] {
        let start = y * self.words_per_row;
        &self.words[start..start + self.words_per_row]
    }

    /// Tests whether `other`, with its origin placed at `offset` in this mask's
    /// coordinates, shares at least one opaque pixel with this mask.
    #[expect(clippy::cast_possible_wrap)]
    #[must_use]
    pub fn overlaps(&self, other: &OpacityMask, offset: (i32, i32)) -> bool {
        let (dx, dy) = (i64::from(offset.0), i64::from(offset.1));
        let y_start = dy.max(0);
        let y_end = (dy + other.height as i64).min(self.height as i64);

        for y in y_start..y_end {
            // y_start >= 0 and y - dy >= 0 within the range
            let row = self.row(y.unsigned_abs() as usize);
            let other_row = other.row((y - dy).unsigned_abs() as usize);
            for (w, &bits) in row.iter().enumerate() {
                if bits == 0 {
                    continue;
                }
                let start = (w * WORD_BITS) as i64 - dx;
                if bits & window(other_row, start) != 0 {
                    return true;
                }
            }
        }
        false
    }
}

/// Returns the 64 bits of `row` starting at bit `start`; bits outside the row are zero.
fn window(row: &[u64], start: i64) -> u64 {
    let word = start.div_euclid(64);
    let shift = start.rem_euclid(64);
    let low = word_at(row, word) >> shift;
    if shift == 0 {
        low
    } else {
        low | (word_at(row, word + 1) << (64 - shift))
    }
}

fn word_at(row: &[u64], index: i64) -> u64 {
    usize::try_from(index)
        .ok()
        .and_then(|i| row.get(i))
        .copied()
        .unwrap_or(0)
}
