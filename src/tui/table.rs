/// Row selection within the visible page
#[derive(Debug, Default)]
pub struct TableState {
    pub selected: Option<usize>,
}

impl TableState {
    pub fn select_next(&mut self, rows: usize) {
        if rows == 0 {
            return;
        }
        let i = match self.selected {
            Some(i) => (i + 1).min(rows - 1),
            None => 0,
        };
        self.selected = Some(i);
    }

    pub fn select_prev(&mut self, rows: usize) {
        if rows == 0 {
            return;
        }
        let i = match self.selected {
            Some(0) | None => 0,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
    }

    pub fn select_first(&mut self, rows: usize) {
        self.selected = if rows == 0 { None } else { Some(0) };
    }

    pub fn select_last(&mut self, rows: usize) {
        if rows == 0 {
            return;
        }
        self.selected = Some(rows - 1);
    }

    /// Keep the selection inside a page of `rows` rows
    pub fn clamp(&mut self, rows: usize) {
        self.selected = match self.selected {
            _ if rows == 0 => None,
            Some(i) => Some(i.min(rows - 1)),
            None => None,
        };
    }
}
