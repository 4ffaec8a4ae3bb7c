//! Combinatorial width expansion for DataBar element groups.
//!
//! A group value is not a positional number. It is the ordinal of one
//! width vector inside a fixed enumeration of every way to distribute
//! `modules` modules over `K` elements, each between one module and
//! `max_width` modules wide. The expansion below walks that enumeration
//! by subtracting the combination counts of the branches it skips, which
//! makes the value to vector mapping bijective.

/// Binomial coefficient, interleaving products and divisions so every
/// intermediate stays exact in integer arithmetic.
fn combins(n: i32, r: i32) -> i32 {
    let (min_denom, max_denom) = if n - r > r { (r, n - r) } else { (n - r, r) };
    let mut val = 1;
    let mut j = 1;
    let mut i = n;
    while i > max_denom {
        val *= i;
        if j <= min_denom {
            val /= j;
            j += 1;
        }
        i -= 1;
    }
    while j <= min_denom {
        val /= j;
        j += 1;
    }
    val
}

/// Expands `value` into the `K` element widths that sum to `modules`.
///
/// `max_width` caps every element. When `no_narrow` is false the vector
/// must contain at least one single-module element, which removes the
/// all-wide combinations from the enumeration; DataBar applies that
/// restriction to odd element groups only.
pub(crate) fn expand<const K: usize>(
    value: u16,
    modules: u8,
    max_width: u8,
    no_narrow: bool,
) -> [u8; K] {
    let elements = K as i32;
    let max_width = i32::from(max_width);
    let mut val = i32::from(value);
    let mut n = i32::from(modules);
    let mut widths = [0u8; K];
    let mut narrow_mask = 0i32;

    for bar in 0..elements - 1 {
        narrow_mask |= 1 << bar;
        let mut elm_width = 1;
        let mut sub_val;
        loop {
            sub_val = combins(n - elm_width - 1, elements - bar - 2);
            if !no_narrow
                && narrow_mask == 0
                && n - elm_width - (elements - bar - 1) >= elements - bar - 1
            {
                sub_val -= combins(n - elm_width - (elements - bar), elements - bar - 2);
            }
            if elements - bar - 1 > 1 {
                let mut less_val = 0;
                let mut mxw_element = n - elm_width - (elements - bar - 2);
                while mxw_element > max_width {
                    less_val += combins(n - elm_width - mxw_element - 1, elements - bar - 3);
                    mxw_element -= 1;
                }
                sub_val -= less_val * (elements - 1 - bar);
            } else if n - elm_width > max_width {
                sub_val -= 1;
            }
            val -= sub_val;
            if val < 0 {
                break;
            }
            elm_width += 1;
            narrow_mask &= !(1 << bar);
        }
        val += sub_val;
        n -= elm_width;
        widths[bar as usize] = elm_width as u8;
    }
    widths[(elements - 1) as usize] = n as u8;
    widths
}
