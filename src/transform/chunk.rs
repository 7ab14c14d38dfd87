/// Samples per forecast day.
pub const HOURS_PER_DAY: usize = 24;

/// Splits `values` into consecutive windows of `window_size` samples.
///
/// The last window is shorter when `values.len()` is not a multiple of
/// `window_size`; nothing is padded. A `window_size` of zero yields no windows.
///
/// # Examples
///
/// ```
/// use forecast_etl::chunk;
///
/// assert_eq!(chunk(&[1, 2, 3, 4, 5], 2), vec![vec![1, 2], vec![3, 4], vec![5]]);
/// ```
pub fn chunk<T: Clone>(values: &[T], window_size: usize) -> Vec<Vec<T>> {
    if window_size == 0 {
        return Vec::new();
    }
    values.chunks(window_size).map(<[T]>::to_vec).collect()
}
