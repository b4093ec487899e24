/*!

This is the long-form manual for `mbti_stats` and `mbtistats`.

## Input formats

The input is a table with a header row. Two formats are supported:
* `csv` Comma Separated Values (the delimiter can be changed)
* `xlsx` Excel workbooks

### Columns

The table must contain columns for the 16 types:

`INTJ INTP ENTJ ENTP INFJ INFP ENFJ ENFP ISTJ ISFJ ESTJ ESFJ ISTP ISFP ESTP ESFP`

The names are matched without regard to the case or to the surrounding spaces: ` intj`
is the `INTJ` column. The order of the columns does not matter. If two columns have the
same type, the first one is used and the other one is ignored.

The reports that break the data down by location also need a location column: the first
column whose name contains `country` or `nation` (in any case), for example `Country`,
`nation_name` or `Nationality`.

|  Country    | INTJ | INTP | ... | ESFP |
|-------------|------|------|-----|------|
| France      | 2.1  | 3.4  |     | 8.0  |
| Japan       | 3.0  | 4.2  |     | 6.1  |

Cells that do not read as numbers (blank, `n/a`, ...) are treated as missing: they are
skipped by all the sums and averages and they never stop a report.

### Percentages or counts

A table can hold either percentages (every row is a distribution over the types) or raw
counts. The mode is inferred: if every row sums to a value between 95 and 105 (inclusive),
the table holds percentages, otherwise counts. A table without any number holds counts.
The inference can be overridden with `--mode percent` or `--mode count`.

## Reports

### `preview`

The header and the first rows of the table (5 by default, see `--preview-rows`).

### `topTypes`

The types ranked by their average (percent mode) or their total (count mode) over all
the locations. The 10 first types are reported by default (`--top`, at most 16). Types with
the same value keep the order of their columns. A column without any number has no average
(`null`, ranked last) and a total of 0. This report does not need a location column.

### `locationProfile`

The 16 values of one location (`--location`), in the canonical order of the types. The
name must match the content of the location column exactly.

### `locations`

The names of all the locations, sorted.

### `categoryByLocation`

The value of one type (`--mbti-type`) for all the locations, the highest first.

### `dimensionRatio`

The types split in two halves along one of the four dimensions (`--dimension`):

| dimension | first side | second side |
|-----------|------------|-------------|
| `EI`      | `E`        | `I`         |
| `NS`      | `N`        | `S`         |
| `TF`      | `T`        | `F`         |
| `JP`      | `J`        | `P`         |

For every location, the report gives the share in percent of the chosen side (`--side`),
rounded to 2 decimals. When both sides sum to zero for a location, the share is `null`.

## Configuration

All the options can be given in a JSON file with `--config`. The options given on the
command line override the ones in the file. The path of the input is relative to the
directory of the configuration file.

```json
{
  "outputSettings": { "title": "MBTI by country", "outputPath": "out.json" },
  "source": { "provider": "csv", "filePath": "countries.csv", "delimiter": "," },
  "report": { "kind": "dimensionRatio", "dimension": "EI", "side": "I" }
}
```

## Output

The result of a report is a JSON document with two fields: `config` recalls the
options of the report and `results` holds the data. It is printed on the standard output
or written to the file given with `--out`. With `--reference`, the output is compared to a
reference file and the differences are printed.

*/
