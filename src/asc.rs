//! ESRI ASCII grid ("ASC") rasters.
//!
//! A file is a short `key value` header followed by `nrows` lines of
//! `ncols` whitespace-delimited numbers, north row first:
//!
//! ```text
//! ncols         3
//! nrows         2
//! xllcorner     28.86
//! yllcorner     -2.84
//! cellsize      0.0083
//! NODATA_value  -9999
//! 1 2 3
//! 4 -9999 6
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::error::{ReduceError, Result};

pub const DEFAULT_NODATA: f64 = -9999.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AscHeader {
    pub ncols: usize,
    pub nrows: usize,
    pub xllcorner: f64,
    pub yllcorner: f64,
    pub cellsize: f64,
    pub nodata: f64,
}

impl AscHeader {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            ncols,
            nrows,
            xllcorner: 0.0,
            yllcorner: 0.0,
            cellsize: 1.0,
            nodata: DEFAULT_NODATA,
        }
    }
}

/// Row-major raster, read-only once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    header: AscHeader,
    values: Vec<f64>,
}

impl Grid {
    /// Returns `None` when `values` does not hold `nrows * ncols` cells.
    pub fn new(header: AscHeader, values: Vec<f64>) -> Option<Self> {
        (values.len() == header.nrows * header.ncols).then_some(Self { header, values })
    }

    /// A grid with the given header where every cell is `value`.
    pub fn filled(header: AscHeader, value: f64) -> Self {
        let values = vec![value; header.nrows * header.ncols];
        Self { header, values }
    }

    pub fn header(&self) -> &AscHeader {
        &self.header
    }

    pub fn rows(&self) -> usize {
        self.header.nrows
    }

    pub fn cols(&self) -> usize {
        self.header.ncols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.header.nrows, self.header.ncols)
    }

    pub fn nodata(&self) -> f64 {
        self.header.nodata
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.header.ncols + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.header.ncols;
        &self.values[start..start + self.header.ncols]
    }

    pub fn is_nodata(&self, value: f64) -> bool {
        value == self.header.nodata
    }
}

#[derive(Default)]
struct HeaderFields {
    ncols: Option<usize>,
    nrows: Option<usize>,
    xll: Option<f64>,
    yll: Option<f64>,
    cellsize: Option<f64>,
    nodata: Option<f64>,
}

fn asc_error(path: &Path, line: usize, message: impl Into<String>) -> ReduceError {
    ReduceError::Asc {
        path: path.to_path_buf(),
        line,
        message: message.into(),
    }
}

impl HeaderFields {
    /// Record a header line. Returns false when `key` is not a header key.
    fn set(&mut self, key: &str, raw: &str, path: &Path, line: usize) -> Result<bool> {
        let float = || {
            raw.parse::<f64>()
                .map_err(|_| asc_error(path, line, format!("invalid value '{raw}' for {key}")))
        };
        let count = || {
            raw.parse::<usize>()
                .map_err(|_| asc_error(path, line, format!("invalid value '{raw}' for {key}")))
        };
        match key {
            "ncols" => self.ncols = Some(count()?),
            "nrows" => self.nrows = Some(count()?),
            "xllcorner" | "xllcenter" => self.xll = Some(float()?),
            "yllcorner" | "yllcenter" => self.yll = Some(float()?),
            "cellsize" => self.cellsize = Some(float()?),
            "nodata_value" => self.nodata = Some(float()?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn finish(self, path: &Path, line: usize) -> Result<AscHeader> {
        let ncols = self.ncols.ok_or_else(|| asc_error(path, line, "header is missing ncols"))?;
        let nrows = self.nrows.ok_or_else(|| asc_error(path, line, "header is missing nrows"))?;
        Ok(AscHeader {
            ncols,
            nrows,
            xllcorner: self.xll.unwrap_or(0.0),
            yllcorner: self.yll.unwrap_or(0.0),
            cellsize: self.cellsize.unwrap_or(1.0),
            nodata: self.nodata.unwrap_or(DEFAULT_NODATA),
        })
    }
}

/// Parse an ASC raster. `path` is only used in error messages.
pub fn parse_asc<R: BufRead>(reader: R, path: &Path) -> Result<Grid> {
    let mut fields = HeaderFields::default();
    let mut header: Option<AscHeader> = None;
    let mut values = Vec::new();
    let mut rows_read = 0;
    let mut last_line = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        last_line = line_no;
        let line = line.map_err(|e| ReduceError::io(path, e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if header.is_none() {
            let mut parts = trimmed.split_whitespace();
            let key = parts.next().unwrap_or_default().to_ascii_lowercase();
            if let Some(raw) = parts.next() {
                if fields.set(&key, raw, path, line_no)? {
                    continue;
                }
            }
            // First non-header line: the header is complete.
            let hdr = std::mem::take(&mut fields).finish(path, line_no)?;
            values.reserve(hdr.nrows * hdr.ncols);
            header = Some(hdr);
        }
        let Some(hdr) = header.as_ref() else { continue };

        if rows_read == hdr.nrows {
            return Err(asc_error(path, line_no, format!("data beyond the {} declared rows", hdr.nrows)));
        }
        let start = values.len();
        for token in trimmed.split_whitespace() {
            let value: f64 = token
                .parse()
                .map_err(|_| asc_error(path, line_no, format!("invalid cell value '{token}'")))?;
            values.push(value);
        }
        let found = values.len() - start;
        if found != hdr.ncols {
            return Err(asc_error(path, line_no, format!("expected {} columns, found {found}", hdr.ncols)));
        }
        rows_read += 1;
    }

    let header = match header {
        Some(hdr) => hdr,
        None => fields.finish(path, last_line)?,
    };
    if rows_read != header.nrows {
        return Err(asc_error(
            path,
            last_line,
            format!("expected {} rows, found {rows_read}", header.nrows),
        ));
    }

    debug!("Loaded {} ({} rows, {} columns)", path.display(), header.nrows, header.ncols);
    Ok(Grid { header, values })
}

/// Load an ASC raster from disk.
pub fn load_asc<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ReduceError::io(path, e))?;
    parse_asc(BufReader::new(file), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_keys_are_case_insensitive() {
        let text = "NCOLS 2\nNROWS 1\nnodata_value -1\n1 2\n";
        let grid = parse_asc(text.as_bytes(), Path::new("t.asc")).unwrap();
        assert_eq!(grid.shape(), (1, 2));
        assert_eq!(grid.nodata(), -1.0);
    }

    #[test]
    fn missing_nodata_uses_default() {
        let text = "ncols 1\nnrows 1\n5\n";
        let grid = parse_asc(text.as_bytes(), Path::new("t.asc")).unwrap();
        assert_eq!(grid.nodata(), DEFAULT_NODATA);
        assert_eq!(grid.get(0, 0), 5.0);
    }
}
