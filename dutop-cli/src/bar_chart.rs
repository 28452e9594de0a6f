/// Unicode partial block characters for smooth bars
const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// Render a size bar using partial block characters
///
/// `percentage` is clamped to 0..=100 and the result is always exactly
/// `width` characters, padded with spaces.
pub fn render_bar(percentage: f64, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let percentage = percentage.clamp(0.0, 100.0);
    let filled_width = (percentage / 100.0) * width as f64;
    let full_blocks = filled_width.floor() as usize;
    let partial = ((filled_width - full_blocks as f64) * 8.0).round() as usize;

    let mut bar = String::with_capacity(width * 3); // Unicode chars can be multi-byte

    for _ in 0..full_blocks.min(width) {
        bar.push(BLOCKS[8]);
    }

    if full_blocks < width && partial > 0 {
        bar.push(BLOCKS[partial.min(8)]);
    }

    let current_len = bar.chars().count();
    for _ in current_len..width {
        bar.push(' ');
    }

    bar
}

/// Bar for `size` relative to the largest size in the chart
///
/// A chart whose largest entry is empty draws full bars.
pub fn proportional_bar(size: u64, largest: u64, width: usize) -> String {
    let percentage = if largest == 0 {
        100.0
    } else {
        size as f64 / largest as f64 * 100.0
    };
    render_bar(percentage, width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_bar_empty() {
        let bar = render_bar(0.0, 10);
        assert_eq!(bar.chars().count(), 10);
        assert!(bar.chars().all(|c| c == ' '));
    }

    #[test]
    fn test_render_bar_full() {
        let bar = render_bar(100.0, 10);
        assert_eq!(bar.chars().count(), 10);
        assert!(bar.chars().all(|c| c == '█'));
    }

    #[test]
    fn test_render_bar_half() {
        let bar = render_bar(50.0, 10);
        assert_eq!(bar.chars().count(), 10);
        assert_eq!(bar.chars().filter(|&c| c == '█').count(), 5);
    }

    #[test]
    fn test_render_bar_zero_width() {
        assert!(render_bar(75.0, 0).is_empty());
    }

    #[test]
    fn test_proportional_bar() {
        assert!(proportional_bar(200, 200, 8).chars().all(|c| c == '█'));
        assert_eq!(proportional_bar(100, 200, 8).chars().filter(|&c| c == '█').count(), 4);
        assert!(proportional_bar(0, 0, 4).chars().all(|c| c == '█'));
    }
}
