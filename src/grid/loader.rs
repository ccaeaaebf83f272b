use std::fs;
use std::path::Path;

use super::{GridData, GridError, Result};

/// Parse a `# <m> <n>` header into `(columns, rows)`.
fn parse_header(line: &str) -> Result<(usize, usize)> {
    let body = line.trim().strip_prefix('#').ok_or_else(|| {
        GridError::MalformedHeader(format!("expected '# <m> <n>', got '{}'", line.trim()))
    })?;

    let dims = body
        .split_whitespace()
        .map(|token| {
            token
                .parse::<usize>()
                .ok()
                .filter(|&d| d > 0)
                .ok_or_else(|| {
                    GridError::MalformedHeader(format!(
                        "expected positive integer, got '{}'",
                        token
                    ))
                })
        })
        .collect::<Result<Vec<usize>>>()?;

    match dims[..] {
        [m, n] => Ok((m, n)),
        _ => Err(GridError::MalformedHeader(format!(
            "expected 2 dimensions, got {}",
            dims.len()
        ))),
    }
}

/// Parse a single sample token
fn parse_value(token: &str, index: usize) -> Result<f32> {
    token
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| GridError::InvalidValue {
            index,
            token: token.to_string(),
        })
}

/// Load grid data from a text file
pub fn load_grid<P: AsRef<Path>>(path: P, sentinel: f32) -> Result<GridData> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| GridError::FileNotFound {
        path: path.display().to_string(),
        source,
    })?;

    parse_grid_content(&content, sentinel)
}

/// Parse grid file content (useful for testing)
///
/// The first line is the header; the remaining text holds `m * n`
/// whitespace-separated values in row-major order, wrapped across lines in
/// any way.
pub fn parse_grid_content(content: &str, sentinel: f32) -> Result<GridData> {
    let (header, body) = content.split_once('\n').unwrap_or((content, ""));
    let (width, height) = parse_header(header)?;
    let expected = width.checked_mul(height).ok_or_else(|| {
        GridError::MalformedHeader(format!("{}x{} grid is too large", width, height))
    })?;

    let mut tokens = body.split_whitespace();
    let samples = tokens
        .by_ref()
        .take(expected)
        .enumerate()
        .map(|(index, token)| parse_value(token, index))
        .collect::<Result<Vec<f32>>>()?;

    if samples.len() < expected {
        return Err(GridError::TruncatedData {
            expected,
            actual: samples.len(),
        });
    }

    let extra = tokens.count();
    if extra > 0 {
        log::warn!("Ignoring {} values past the declared {}x{} grid", extra, width, height);
    }

    let data = GridData::new(width, height, samples, sentinel);
    log::debug!("Parsed {}x{} grid, range {:?}", width, height, data.range);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_grid() {
        let content = "# 3 2\n0.5 1 2\n3 4 5\n";
        let grid = parse_grid_content(content, 0.0).unwrap();

        assert_eq!(grid.width, 3);
        assert_eq!(grid.height, 2);
        assert_eq!(grid.samples, vec![0.5, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_parse_values_span_lines() {
        let content = "# 2 3\n1 2 3\n4\n5 6";
        let grid = parse_grid_content(content, 0.0).unwrap();

        assert_eq!(grid.samples, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_parse_tabs_and_crlf() {
        let content = "# 2 2\r\n1\t2\r\n3\t4\r\n";
        let grid = parse_grid_content(content, 0.0).unwrap();

        assert_eq!(grid.samples, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_parse_header_without_space() {
        assert_eq!(parse_header("#4 5").unwrap(), (4, 5));
        assert_eq!(parse_header("  #  4   5  ").unwrap(), (4, 5));
    }

    #[test]
    fn test_parse_missing_hash() {
        let result = parse_grid_content("3 2\n1 2 3 4 5 6", 0.0);
        assert!(matches!(result, Err(GridError::MalformedHeader(_))));
    }

    #[test]
    fn test_parse_zero_dimension() {
        let result = parse_grid_content("# 0 2\n", 0.0);
        assert!(matches!(result, Err(GridError::MalformedHeader(_))));
    }

    #[test]
    fn test_parse_non_numeric_dimension() {
        let result = parse_grid_content("# a 2\n1 2", 0.0);
        assert!(matches!(result, Err(GridError::MalformedHeader(_))));
    }

    #[test]
    fn test_parse_wrong_dimension_count() {
        assert!(matches!(
            parse_grid_content("# 2\n1 2", 0.0),
            Err(GridError::MalformedHeader(_))
        ));
        assert!(matches!(
            parse_grid_content("# 2 2 2\n1 2 3 4", 0.0),
            Err(GridError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_parse_empty_file() {
        let result = parse_grid_content("", 0.0);
        assert!(matches!(result, Err(GridError::MalformedHeader(_))));
    }

    #[test]
    fn test_parse_truncated() {
        let content = "# 3 3\n1 2 3\n4 5";
        let result = parse_grid_content(content, 0.0);

        assert!(matches!(
            result,
            Err(GridError::TruncatedData {
                expected: 9,
                actual: 5
            })
        ));
    }

    #[test]
    fn test_parse_ignores_extra_values() {
        let content = "# 2 1\n1 2 3 4";
        let grid = parse_grid_content(content, 0.0).unwrap();

        assert_eq!(grid.samples, vec![1.0, 2.0]);
    }

    #[test]
    fn test_parse_invalid_value() {
        let content = "# 2 2\n1 2\nx 4";
        let result = parse_grid_content(content, 0.0);

        assert!(matches!(
            result,
            Err(GridError::InvalidValue { index: 2, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_nan() {
        let result = parse_grid_content("# 2 1\n1 NaN", 0.0);
        assert!(matches!(result, Err(GridError::InvalidValue { index: 1, .. })));
    }

    #[test]
    fn test_parse_custom_sentinel() {
        let content = "# 3 1\n-999 2 8";
        let grid = parse_grid_content(content, -999.0).unwrap();
        let range = grid.range.unwrap();

        assert_eq!(range.min, 2.0);
        assert_eq!(range.max, 8.0);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_grid("/nonexistent/grid/file.txt", 0.0);
        assert!(matches!(result, Err(GridError::FileNotFound { .. })));
    }
}
