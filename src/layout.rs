//! Label grid geometry and pagination.
//!
//! Everything here is in PDF points (1/72 inch) with the origin at the bottom
//! left of the page, so the module can be tested without producing a PDF.

/// Points per inch.
pub const INCH: f32 = 72.0;

/// Physical layout of one label sheet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelGrid {
    pub page_width: f32,
    pub page_height: f32,
    pub columns: usize,
    pub rows: usize,
    pub label_width: f32,
    pub label_height: f32,
    /// Left margin, also used as the gap between columns.
    pub margin_x: f32,
    pub margin_y: f32,
    /// Side length of the square QR code.
    pub qr_size: f32,
    /// Distance from the label top down to the name baseline.
    pub name_drop: f32,
    /// How far the QR code sits below the label centre.
    pub qr_drop: f32,
}

impl LabelGrid {
    /// Avery 5164 shipping labels on US Letter: 2 × 3 labels of 4" × 3.33".
    pub fn avery_5164() -> Self {
        Self {
            page_width: 8.5 * INCH,
            page_height: 11.0 * INCH,
            columns: 2,
            rows: 3,
            label_width: 4.0 * INCH,
            label_height: 3.33 * INCH,
            margin_x: 0.156 * INCH,
            margin_y: 0.5 * INCH,
            qr_size: 2.0 * INCH,
            name_drop: 60.0,
            qr_drop: 20.0,
        }
    }

    pub fn labels_per_page(&self) -> usize {
        self.columns * self.rows
    }

    /// Cell for the `index`-th label of a page, filled left to right then top
    /// to bottom. `None` once the index runs past the last row.
    pub fn cell(&self, index: usize) -> Option<Cell> {
        let column = index % self.columns;
        let row = index / self.columns;
        if row >= self.rows {
            return None;
        }
        Some(Cell {
            column,
            row,
            x: self.margin_x + column as f32 * (self.label_width + self.margin_x),
            y: self.page_height - self.margin_y - (row + 1) as f32 * self.label_height,
        })
    }
}

impl Default for LabelGrid {
    fn default() -> Self {
        Self::avery_5164()
    }
}

/// Bottom left corner of a label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub column: usize,
    pub row: usize,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Where one label's name and code go on the page.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    /// Position within the page, 0-based.
    pub index: usize,
    pub cell: Cell,
    /// Left end of the name's baseline.
    pub name_x: f32,
    pub name_y: f32,
    pub code: Rect,
}

/// Splits `items` into page-sized groups. An empty slice still yields one
/// (blank) page.
pub fn paginate<'a, T>(items: &'a [T], grid: &LabelGrid) -> Vec<&'a [T]> {
    if items.is_empty() {
        return vec![items];
    }
    items.chunks(grid.labels_per_page().max(1)).collect()
}

/// Positions up to one page of names, centring each name with `measure`
/// (text width in points) and the code in the space below it.
///
/// Names past the grid capacity are dropped.
pub fn layout_page<S, F>(grid: &LabelGrid, names: &[S], measure: F) -> Vec<Placement>
where
    S: AsRef<str>,
    F: Fn(&str) -> f32,
{
    names
        .iter()
        .enumerate()
        .map_while(|(index, name)| {
            let cell = grid.cell(index)?;
            let name_width = measure(name.as_ref());
            Some(Placement {
                index,
                cell,
                name_x: cell.x - name_width / 2.0 + grid.label_width / 2.0,
                name_y: cell.y + grid.label_height - grid.name_drop,
                code: Rect {
                    x: cell.x + (grid.label_width - grid.qr_size) / 2.0,
                    y: cell.y + (grid.label_height - grid.qr_size) / 2.0 - grid.qr_drop,
                    width: grid.qr_size,
                    height: grid.qr_size,
                },
            })
        })
        .collect()
}
