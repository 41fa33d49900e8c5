/*!

This is the long-form manual for `topsis` and the `topsis` command line program.

## The method

TOPSIS (Technique for Order Preference by Similarity to Ideal Solution) ranks
alternatives (the rows of a table) that are compared over several numeric criteria
(the numeric columns). Every criterion comes with a weight and an impact:
- `benefit` (or `+`): higher values are better
- `cost` (or `-`): lower values are better

The computation runs in the following steps:
1. every criterion column is divided by its root-sum-of-squares. A column that
 only contains zeros is left as is.
2. every normalized column is multiplied by its weight. Weights do not need to sum to 1.
3. the ideal best point takes, for each criterion, the best weighted value found in
 the table (the maximum for a benefit, the minimum for a cost). The ideal worst point
 takes the other extreme.
4. for each row, the Euclidean distances to the ideal best (`dist_best`) and to the
 ideal worst (`dist_worst`) points are computed.
5. the score is `dist_worst / (dist_best + dist_worst)`, between 0 and 1. When both
 distances are zero (all the rows are equal), the score is 0.
6. the rows are ranked by decreasing score. Rows with equal scores share the same rank
 and the next score gets the next rank (dense ranking: `1, 2, 2, 3`).

## Which columns are criteria

Criteria are detected from the content of the table: a column is a criterion if all
its cells are finite numbers. All the other columns (names, identifiers, comments)
are carried to the output without change. There must be at least 2 criteria, and
the weights and impacts are given in the order of the criteria columns.

## Input formats

### `csv`

A CSV file with a header row:

```text
Model,Price,Storage,Camera,Looks
M1,250,16,12,5
M2,200,16,8,3
M3,300,32,16,4
M4,275,32,8,4
```

### `xlsx`

An Excel workbook. The first worksheet is used unless a worksheet name is provided.
The first row is the header.

## Running

```bash
topsis -i phones.csv -w 1,1,1,1 --impacts -,+,+,+ -o result.csv
```

The form used by the older scripts is also accepted. Since impacts may start with
`-`, put the arguments after `--`:

```bash
topsis -- phones.csv "1,1,1,1" "-,+,+,+" result.csv
```

The output is the input table with two more columns, `Topsis Score` and `Rank`.

```text
Model,Price,Storage,Camera,Looks,Topsis Score,Rank
M1,250,16,12,5,0.45866003915521114,3
M2,200,16,8,3,0.26674751595511037,4
M3,300,32,16,4,0.6797839038748799,1
M4,275,32,8,4,0.4635477360041369,2
```

Other options:
 - `--summary <file>` writes a JSON summary with the ideal points and the distances
 of every row.
 - `--reference <file>` compares the output with an expected CSV file and fails if
 they differ. A diff is printed.
 - `--verbose` turns on the debug logs.

## Configuration

All the options may also be given in a JSON file with `--config`. Options passed on
the command line take precedence. Relative paths are resolved against the directory
of the configuration file.

```text
{
  "input": {
    "provider": "xlsx",
    "filePath": "phones.xlsx",
    "excelWorksheetName": "Sheet1"
  },
  "weights": [1, 1, 1, 1],
  "impacts": "-,+,+,+",
  "outputFile": "result.csv",
  "summaryFile": "summary.json"
}
```

`weights` and `impacts` accept either a comma-separated string or an array.

 */
