//! Fixed line offsets of the scorecard text layout.

/// Positional fields are read only from documents with at least this many lines.
pub const MIN_POSITIONAL_LINES: usize = 12;

/// A field read from a fixed line of the document.
///
/// Lines 5, 6, 7, 10 and 11 carry labels and nothing is read from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineField {
    RegisterNo,
    TestPaper,
    Name,
    AllIndiaRank,
    AdditionalInfo,
    Score,
    MarksOutOf100,
    Date,
}

impl LineField {
    /// All positional fields, in line order.
    pub const ALL: [LineField; 8] = [
        LineField::RegisterNo,
        LineField::TestPaper,
        LineField::Name,
        LineField::AllIndiaRank,
        LineField::AdditionalInfo,
        LineField::Score,
        LineField::MarksOutOf100,
        LineField::Date,
    ];

    /// Zero-based line index the field is read from.
    pub fn line_index(self) -> usize {
        match self {
            LineField::RegisterNo => 0,
            LineField::TestPaper => 1,
            LineField::Name => 2,
            LineField::AllIndiaRank => 3,
            LineField::AdditionalInfo => 4,
            LineField::Score => 8,
            LineField::MarksOutOf100 => 9,
            LineField::Date => 12,
        }
    }

    /// Serialized field name.
    pub fn name(self) -> &'static str {
        match self {
            LineField::RegisterNo => "register_no",
            LineField::TestPaper => "test_paper",
            LineField::Name => "name",
            LineField::AllIndiaRank => "all_india_rank",
            LineField::AdditionalInfo => "additional_info",
            LineField::Score => "score",
            LineField::MarksOutOf100 => "marks_out_of_100",
            LineField::Date => "date",
        }
    }

    /// Whether the line must pass the digit guard.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            LineField::AllIndiaRank | LineField::Score | LineField::MarksOutOf100
        )
    }

    /// Trimmed text of this field's line, if the document has that line.
    pub fn line<'a>(self, lines: &[&'a str]) -> Option<&'a str> {
        lines.get(self.line_index()).map(|l| l.trim())
    }
}
