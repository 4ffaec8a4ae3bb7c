//! The print region, the only artifact a renderer consumes.

/// One renderable strip of a symbol.
///
/// The pattern is a run of element widths in modules; whether the run
/// starts with a space or a bar is carried by `white_first` rather than
/// encoded in the widths. `left_pad` and `right_pad` are quiet zone
/// modules the renderer must leave blank, `height` is the number of
/// identical pixel rows to paint. When `guards` is set the renderer
/// brackets the pattern with a narrow pair of elements on each side, and
/// `reverse` asks for the element order to be mirrored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintRegion {
    pub pattern: Vec<u8>,
    pub left_pad: u16,
    pub right_pad: u16,
    pub height: u32,
    pub white_first: bool,
    pub guards: bool,
    pub reverse: bool,
}

impl PrintRegion {
    /// Total width of the printed pattern in modules, guards included,
    /// padding excluded.
    pub fn modules(&self) -> u32 {
        let guards = if self.guards { 4 } else { 0 };
        self.pattern.iter().map(|&w| u32::from(w)).sum::<u32>() + guards
    }

    /// Iterates over the modules of one pixel row, `true` for a bar.
    ///
    /// Guards and reversal are applied; padding is not, since the
    /// renderer positions the region itself.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        let guard: &'static [u8] = if self.guards { &[1, 1] } else { &[] };
        let pattern: Box<dyn Iterator<Item = u8> + '_> = if self.reverse {
            Box::new(self.pattern.iter().rev().copied())
        } else {
            Box::new(self.pattern.iter().copied())
        };
        let mut bar = !self.white_first;
        guard
            .iter()
            .copied()
            .chain(pattern)
            .chain(guard.iter().copied())
            .flat_map(move |width| {
                let color = bar;
                bar = !bar;
                core::iter::repeat(color).take(usize::from(width))
            })
    }
}
