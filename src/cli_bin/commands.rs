//! CLI command handlers that bridge CLI arguments to library operations

use crate::cli_bin::args::*;
use log::{debug, info, warn};
use matterq::error::Result;
use matterq::io::render;
use matterq::{
    load_query_file, parse_condition_expr, DocumentLoader, DocumentResolver, QueryEngine,
    QuerySpec, Record, SortOrder, SortSpec,
};
use std::collections::{BTreeMap, BTreeSet};

/// Execute the query command
pub fn query_command(args: QueryArgs) -> Result<()> {
    debug!("Executing query command with args: {:?}", args);

    let spec = build_query(&args)?;
    let records = load_records(&args.documents)?;
    if records.is_empty() {
        warn!("No documents found to query");
        return Ok(());
    }

    let results = QueryEngine::new().execute(&records, &spec);
    info!("{} of {} documents matched", results.len(), records.len());

    print!("{}", render(&results, spec.fields(), args.format.into())?);
    Ok(())
}

/// Execute the show command
pub fn show_command(args: ShowArgs) -> Result<()> {
    debug!("Executing show command with args: {:?}", args);

    let record = DocumentLoader::new().load_file(&args.file)?;
    if record.is_empty() {
        info!("{} has no front matter", args.file.display());
    }

    match args.format {
        RecordFormatArg::Yaml => print!("{}", serde_yaml::to_string(&record)?),
        RecordFormatArg::Json => println!("{}", serde_json::to_string_pretty(&record)?),
    }
    Ok(())
}

/// Execute the fields command
pub fn fields_command(args: FieldsArgs) -> Result<()> {
    debug!("Executing fields command with args: {:?}", args);

    let records = load_records(&args.documents)?;
    if records.is_empty() {
        warn!("No documents found");
        return Ok(());
    }

    let usage = field_usage(&records);
    let width = usage.keys().map(String::len).max().unwrap_or(0);
    for (name, (count, types)) in &usage {
        let types: Vec<&str> = types.iter().copied().collect();
        println!("{:width$}  {:>5}  {}", name, count, types.join(", "), width = width);
    }
    Ok(())
}

/// Merge a query file with command-line overrides
///
/// `--where` conditions replace file conditions on the same field.
fn build_query(args: &QueryArgs) -> Result<QuerySpec> {
    let mut spec = match &args.query_file {
        Some(path) => {
            debug!("Loading query file: {}", path.display());
            load_query_file(path)?
        }
        None => QuerySpec::new(),
    };

    for expr in &args.conditions {
        let (field, condition) = parse_condition_expr(expr)?;
        debug!("Condition on {}: {:?}", field, condition);
        spec.set_condition(field, condition);
    }

    let order = if args.desc {
        SortOrder::Desc
    } else {
        SortOrder::Asc
    };
    match (&args.sort, spec.sort().cloned()) {
        (Some(field), _) => spec = spec.sort_by(field, order),
        (None, Some(existing)) if args.desc => {
            spec = spec.with_sort(Some(SortSpec::desc(existing.field)))
        }
        (None, None) if args.desc => warn!("--desc has no effect without a sort field"),
        _ => {}
    }

    if let Some(n) = args.limit {
        spec = spec.limit(n);
    }
    if !args.fields.is_empty() {
        spec = spec.select(args.fields.iter().map(|f| f.trim().to_string()));
    }
    Ok(spec)
}

fn load_records(options: &DocumentOptions) -> Result<Vec<Record>> {
    let resolver = DocumentResolver::with_config(options.resolver_config())?;
    let loader = DocumentLoader::with_config(options.loader_config());
    loader.load_paths(&resolver, &options.paths)
}

/// Per field: how many documents set it, and which value types it holds
fn field_usage(records: &[Record]) -> BTreeMap<String, (usize, BTreeSet<&'static str>)> {
    let mut usage: BTreeMap<String, (usize, BTreeSet<&'static str>)> = BTreeMap::new();
    for record in records {
        for (name, value) in record.fields() {
            let entry = usage.entry(name.clone()).or_default();
            entry.0 += 1;
            entry.1.insert(value.type_name());
        }
    }
    usage
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use matterq::{parse_document, Value};

    fn query_args(argv: &[&str]) -> QueryArgs {
        let mut full = vec!["matterq", "query"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Query(args) => args,
            _ => panic!("expected query command"),
        }
    }

    #[test]
    fn test_build_query_from_flags() {
        let args = query_args(&[
            "notes",
            "--where",
            "type=book",
            "-w",
            "rating:gte=4",
            "--sort",
            "start",
            "--desc",
            "--limit",
            "3",
            "--fields",
            "title,rating",
        ]);
        let spec = build_query(&args).unwrap();

        assert_eq!(spec.conditions().len(), 2);
        assert_eq!(spec.sort(), Some(&SortSpec::desc("start")));
        assert_eq!(spec.limit_value(), Some(3));
        assert_eq!(
            spec.fields(),
            Some(&["title".to_string(), "rating".to_string()][..])
        );
    }

    #[test]
    fn test_where_overrides_query_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("books.yaml");
        std::fs::write(&path, "where:\n  type: movie\n  rating: { gte: 3 }\nsort: start\n").unwrap();

        let args = query_args(&[
            "--query-file",
            path.to_str().unwrap(),
            "--where",
            "type=book",
            "--desc",
        ]);
        let spec = build_query(&args).unwrap();

        let names: Vec<_> = spec.conditions().iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(names, ["type", "rating"]);
        assert_eq!(spec.sort(), Some(&SortSpec::desc("start")));

        let book = parse_document("---\ntype: book\nrating: 4\n---\n", "a.md");
        let movie = parse_document("---\ntype: movie\nrating: 4\n---\n", "b.md");
        let results = QueryEngine::new().execute(&[book, movie], &spec);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].value("type"), &Value::from("book"));
    }

    #[test]
    fn test_field_usage() {
        let records = vec![
            parse_document("---\nrating: 4\ntags: [a]\n---\n", "a.md"),
            parse_document("---\nrating: n/a\n---\n", "b.md"),
        ];
        let usage = field_usage(&records);

        assert_eq!(usage["rating"].0, 2);
        assert_eq!(
            usage["rating"].1.iter().copied().collect::<Vec<_>>(),
            ["number", "string"]
        );
        assert_eq!(usage["tags"].0, 1);
    }
}
