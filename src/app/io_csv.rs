// Primitives for reading and writing CSV files.

use topsis::builder::Builder;

use crate::app::*;

/// Reads a CSV file with a header row. Every cell goes through [Value::parse].
pub fn read_csv_table(path: &str) -> AppResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { path, lineno: 1usize })?
        .iter()
        .map(|s| s.trim().to_string())
        .collect();
    debug!("read_csv_table: header: {:?}", header);
    if header.is_empty() {
        return MissingHeaderSnafu { path }.fail();
    }

    let mut builder = Builder::new(&header);
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        let cells: Vec<Value> = line.iter().map(Value::parse).collect();
        builder.add_row(cells).context(ScoringSnafu {})?;
    }
    debug!("read_csv_table: {:?} rows", builder.num_rows());
    Ok(builder.build())
}

/// Serializes the augmented table, header included.
pub fn write_csv_table(scored: &ScoredTable) -> AppResult<String> {
    let mut buf: Vec<u8> = Vec::new();
    {
        let mut wtr = csv::Writer::from_writer(&mut buf);
        wtr.write_record(scored.header())
            .context(CsvWriteSnafu {})?;
        for row in scored.rows() {
            wtr.write_record(row.iter().map(|v| v.to_string()))
                .context(CsvWriteSnafu {})?;
        }
        wtr.flush()
            .context(WritingFileSnafu { path: "<memory>" })?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
