//! Cell averaging: partition a luminance image into a character grid.

use std::ops::Range;

/// Pixel range covered by cell `index` when `extent` pixels are split into
/// `cells` cells.
///
/// Uses floor-division partitioning: `[index*extent/cells, (index+1)*extent/cells)`.
/// Consecutive spans share their boundary, so the cells tile `0..extent`
/// exactly. Span lengths differ by at most one pixel across the grid.
#[inline]
pub fn cell_span(index: u32, extent: u32, cells: u32) -> Range<usize> {
    let extent = extent as u64;
    let cells = cells.max(1) as u64;
    let start = index as u64 * extent / cells;
    let end = (index as u64 + 1) * extent / cells;
    start as usize..end as usize
}

/// Average a luminance image down to a character grid.
///
/// Each cell's value is the truncated mean `sum / count` of its pixels.
/// A cell containing no pixels (only possible when the grid is larger than
/// the image) is 0.
///
/// # Arguments
/// * `luminance` - One byte per pixel, row-major, `width * height` long
/// * `width` - Width of the source image in pixels
/// * `height` - Height of the source image in pixels
/// * `cols` - Grid width in cells
/// * `rows` - Grid height in cells
///
/// # Returns
/// A row-major vector of `cols * rows` mean luminance values.
///
/// # Example
/// ```
/// use vidtoascii::ascii::downsample;
///
/// let means = downsample(&[0, 0, 255, 255], 4, 1, 2, 1);
/// assert_eq!(means, vec![0, 255]);
/// ```
pub fn downsample(luminance: &[u8], width: u32, height: u32, cols: u32, rows: u32) -> Vec<u8> {
    let mut means = Vec::with_capacity((cols as usize) * (rows as usize));
    downsample_into(luminance, width, height, cols, rows, &mut means);
    means
}

/// Average a luminance image into an existing buffer to avoid allocation.
///
/// # Returns
/// The number of cell values written (`cols * rows`).
pub fn downsample_into(
    luminance: &[u8],
    width: u32,
    height: u32,
    cols: u32,
    rows: u32,
    buffer: &mut Vec<u8>,
) -> usize {
    buffer.clear();
    if cols == 0 || rows == 0 {
        return 0;
    }
    debug_assert_eq!(luminance.len(), (width as usize) * (height as usize));

    let stride = width as usize;
    buffer.reserve((cols as usize) * (rows as usize));

    for cy in 0..rows {
        let ys = cell_span(cy, height, rows);
        for cx in 0..cols {
            let xs = cell_span(cx, width, cols);

            let mut sum = 0u64;
            let mut count = 0u64;
            for y in ys.clone() {
                let row = &luminance[y * stride..(y + 1) * stride];
                for &v in &row[xs.clone()] {
                    sum += v as u64;
                    count += 1;
                }
            }

            buffer.push(if count > 0 { (sum / count) as u8 } else { 0 });
        }
    }

    buffer.len()
}
