// Primitives for reading Excel workbooks.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use topsis::builder::Builder;

use crate::app::*;

/// Reads a worksheet into a table. The first row is the header.
///
/// Without a worksheet name, the first worksheet of the workbook is used.
pub fn read_excel_table(path: &str, worksheet_name: Option<&str>) -> AppResult<Table> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header: Vec<String> = iter
        .next()
        .context(MissingHeaderSnafu { path })?
        .iter()
        .map(read_header_cell)
        .collect();
    debug!("read_excel_table: header: {:?}", header);

    let mut builder = Builder::new(&header);
    for (idx, row) in iter.enumerate() {
        debug!("read_excel_table: idx: {:?} row: {:?}", idx, row);
        let cells: Vec<Value> = row.iter().map(read_cell).collect();
        builder.add_row(cells).context(ScoringSnafu {})?;
    }
    Ok(builder.build())
}

fn read_header_cell(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.trim().to_string(),
        DataType::Empty => "".to_string(),
        other => other.to_string(),
    }
}

fn read_cell(cell: &DataType) -> Value {
    match cell {
        DataType::Float(f) => Value::Number(*f),
        DataType::Int(i) => Value::Number(*i as f64),
        DataType::String(s) => Value::parse(s),
        DataType::Empty => Value::Text("".to_string()),
        // Dates, booleans and errors are labels, not criteria.
        other => Value::Text(other.to_string()),
    }
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> AppResult<Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    let wrange = match worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { path, name })?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?,
    };
    Ok(wrange)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(read_cell(&DataType::Float(2.5)), Value::Number(2.5));
        assert_eq!(read_cell(&DataType::Int(3)), Value::Number(3.0));
        assert_eq!(
            read_cell(&DataType::String(" 12 ".to_string())),
            Value::Number(12.0)
        );
        assert_eq!(
            read_cell(&DataType::String("M1".to_string())),
            Value::Text("M1".to_string())
        );
        assert_eq!(read_cell(&DataType::Empty), Value::Text("".to_string()));
        assert!(read_cell(&DataType::Bool(true)).as_number().is_none());
    }

    #[test]
    fn header_cells() {
        assert_eq!(
            read_header_cell(&DataType::String(" Price ".to_string())),
            "Price"
        );
        assert_eq!(read_header_cell(&DataType::Empty), "");
        assert_eq!(read_header_cell(&DataType::Int(2020)), "2020");
    }

    const PHONES_XLSX: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/phones.xlsx");

    #[test]
    fn reads_first_worksheet() {
        let table = read_excel_table(PHONES_XLSX, None).unwrap();
        let names: Vec<String> = table.columns().iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["Model", "Price", "Storage", "Note"]);
        assert_eq!(table.num_rows(), 3);
        // "32" is stored as text in the workbook and still counts as a number.
        assert_eq!(table.numeric_columns(), vec![1, 2]);
        assert_eq!(table.column_values(2), vec![16.0, 32.0, 64.0]);
        assert_eq!(table.rows()[0][0], Value::Text("M1".to_string()));
        assert_eq!(table.rows()[1][3], Value::Text("".to_string()));
        assert_eq!(table.row_label(2), "M3");
    }

    #[test]
    fn reads_named_worksheet() {
        let table = read_excel_table(PHONES_XLSX, Some("Phones")).unwrap();
        assert_eq!(table.column_values(1), vec![250.0, 200.0, 300.0]);
        assert!(matches!(
            read_excel_table(PHONES_XLSX, Some("Laptops")),
            Err(AppError::MissingWorksheet { .. })
        ));
    }

    #[test]
    fn missing_workbook() {
        assert!(matches!(
            read_excel_table("/nonexistent/topsis/input.xlsx", None),
            Err(AppError::OpeningExcel { .. })
        ));
    }
}
