/*!

This is the long-form manual for `attendance_cards` and `attcards`.

## The sheet

The sheet has one row of day labels (the header row) and one column of
metric labels (the label column). Every other header cell that reads as a
day becomes a day card:

```text
Métrica,Lunes 08/01,Martes 09/01,2024-01-10
Línea TM,10,12,11
Línea TT,8,9,
Productividad,95%,90%,91%
Inasistencias TM,2,0,1
,"1002, 1001",,1500
,1001,,
```

Day labels are read as `YYYY-MM-DD`, `DD/MM/YYYY`, `DD/MM/YY` or `DD/MM`
(in the current year), in this order, anywhere in the cell. Cells that do
not read as a day are ignored.

## Reserved rows

Labels are compared once lowercased, without accents and with single spaces.

| label                                   | effect |
|-----------------------------------------|--------|
| contains `linea tm` / `line tm`         | the TM line KPI |
| contains `linea tt` / `line tt`         | the TT line KPI |
| contains `legajo`/`roster` and `inasist`/`absence` | the value lists the absent identifiers |
| is `inasistencias tm` / `absences tm`   | the value is a count, the identifiers follow in rows with an empty label |

Reserved rows are not shown as metrics, except the KPI rows whose label
only contains the keyword (`Línea TM (objetivo)` feeds the KPI and is
still shown). Rows with an empty label are never shown.

Identifiers are the runs of at least three digits in a cell. They are
deduplicated and sorted by value. Hours such as `6:26` are never read as
identifiers.

## Roster policies

When a sheet has both an explicit roster row and a count followed by
identifier rows, the policy decides which one wins:

- `rowOrder` (default): the last one met in the column, an empty list of
  identifier rows never clears a previous roster.
- `explicitFirst`: the explicit row, when it lists at least one identifier;
  otherwise the continuation rows.
- `explicitOnly`, `continuationOnly`: a single source.
- `fixedRange`: every cell of the day column between `rosterFirstRow` and
  `rosterLastRow` (1-based, inclusive), whatever the labels.

## The window

The anchor is the most recent day that is not after today. The window is the
anchor and the `daysBack` days before it, most recent first. Days after today
are never shown.

## Configuration

`attcards` works without configuration for a sheet whose day labels are in
the first row and metric labels in the first column. Otherwise, pass a JSON
file with `--config`:

```json
{
  "source": { "provider": "csv", "filePath": "asistencia.csv" },
  "layout": { "headerRowIndex": 1, "labelColumnIndex": "A" },
  "window": { "daysBack": 6 },
  "rules": { "rosterPolicy": "rowOrder" },
  "output": { "outputPath": "stdout" }
}
```

Indexes are 1-based and may be numbers, strings or column letters. The
`filePath` is relative to the configuration file. Every value may be
overridden on the command line (see `attcards --help`).

The `xlsx` provider reads the first worksheet of a workbook, or the one
named by `excelWorksheetName`.

 */
