use std::{env, fs, path::PathBuf, process::ExitCode};

use serde_json::Value as JsonValue;

use oas_mapper::{
    map_definitions, map_type_with, wrap_components, IdentityNormalizer, MapperOptions,
    NullExtensionResolver, ReferenceDialect,
};

#[derive(Debug)]
struct MapOptions {
    pretty: bool,
    mapper: MapperOptions,
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    match run(env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    if args.len() < 3 {
        return Err("not enough arguments".to_string());
    }

    let command = args[1].as_str();
    let file = PathBuf::from(&args[2]);
    let options = parse_map_options(&args[3..])?;

    match command {
        "map" => run_map(&file, &options),
        "schema" => run_schema(&file, &options),
        _ => Err(format!("unknown command '{command}'")),
    }
}

fn run_map(file: &PathBuf, options: &MapOptions) -> Result<(), String> {
    let root = read_json(file)?;
    let definitions = root
        .as_object()
        .ok_or_else(|| "definitions document must be an object".to_string())?;

    let schemas = map_definitions(
        definitions,
        &options.mapper,
        &NullExtensionResolver,
        &IdentityNormalizer,
    );
    for name in definitions.keys() {
        if !schemas.contains_key(name) {
            eprintln!("warning: definition '{name}' produced no schema and was skipped");
        }
    }

    write_output(&wrap_components(schemas), options)
}

fn run_schema(file: &PathBuf, options: &MapOptions) -> Result<(), String> {
    let descriptor = read_json(file)?;
    let mapped = map_type_with(
        &descriptor,
        &options.mapper,
        &NullExtensionResolver,
        &IdentityNormalizer,
    );

    let value = match mapped {
        Some(value) => value,
        None => {
            eprintln!("warning: descriptor produced no schema");
            JsonValue::Null
        }
    };
    write_output(&value, options)
}

fn read_json(file: &PathBuf) -> Result<JsonValue, String> {
    let input =
        fs::read_to_string(file).map_err(|e| format!("failed to read '{}': {e}", file.display()))?;
    serde_json::from_str(&input).map_err(|e| format!("invalid JSON in '{}': {e}", file.display()))
}

fn write_output(value: &JsonValue, options: &MapOptions) -> Result<(), String> {
    let rendered = if options.pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| e.to_string())?;

    match &options.output {
        Some(path) => fs::write(path, rendered + "\n")
            .map_err(|e| format!("failed to write '{}': {e}", path.display())),
        None => {
            println!("{rendered}");
            Ok(())
        }
    }
}

fn parse_map_options(args: &[String]) -> Result<MapOptions, String> {
    let mut pretty = false;
    let mut mapper = MapperOptions::default();
    let mut output: Option<PathBuf> = None;
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--pretty" => {
                pretty = true;
                i += 1;
            }
            "--no-property-merge" => {
                mapper.property_aware_combinators = false;
                i += 1;
            }
            "--dialect" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| "--dialect requires a value".to_string())?;
                mapper.reference_dialect = match value.as_str() {
                    "simple" => ReferenceDialect::Simple,
                    "extended" => ReferenceDialect::Extended,
                    other => return Err(format!("unknown dialect '{other}'")),
                };
                i += 2;
            }
            "--output" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| "--output requires a file".to_string())?;
                output = Some(PathBuf::from(value));
                i += 2;
            }
            other => return Err(format!("unknown option '{other}'")),
        }
    }

    Ok(MapOptions {
        pretty,
        mapper,
        output,
    })
}

fn print_usage() {
    eprintln!("usage:");
    eprintln!(
        "  oas-mapper map <definitions.json> [--pretty] [--dialect simple|extended] [--no-property-merge] [--output <file>]"
    );
    eprintln!(
        "  oas-mapper schema <descriptor.json> [--pretty] [--dialect simple|extended] [--no-property-merge] [--output <file>]"
    );
}
