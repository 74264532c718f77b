// codegen - render a schema JSON file to a project archive or directory
use std::env;
use std::fs;
use std::path::Path;
use crud_generator::{
    archive::{archive, write_tree},
    codegen::{render, RenderMode},
    schema::GenerationRequest,
};

fn print_usage() {
    eprintln!("Usage: codegen <command> <schema.json> <output>");
    eprintln!("Commands:");
    eprintln!("  zip       - Write the generated project as a zip archive");
    eprintln!("  dir       - Write the generated project into a directory");
    eprintln!("  validate  - Validate a schema file (no output argument)");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    run(&args)
}

fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    if args.len() < 3 {
        print_usage();
        return Err("Missing command or schema file".into());
    }

    let raw = fs::read_to_string(&args[2])?;
    let request = GenerationRequest::from_json_str(&raw)?;

    let warnings = request.lint();
    for warning in &warnings {
        eprintln!("⚠️  {}", warning);
    }

    match (args[1].as_str(), args.get(3)) {
        ("validate", _) => {
            println!("✅ Schema is valid: {} entities, {} warnings", request.entities.len(), warnings.len());
        }
        ("zip", Some(output)) => {
            let files = render(&request, RenderMode::Full)?;
            fs::write(output, archive(&files)?)?;
            println!("✅ Wrote {} files to {}", files.len(), output);
        }
        ("dir", Some(output)) => {
            let files = render(&request, RenderMode::Full)?;
            write_tree(&files, Path::new(output))?;
            println!("✅ Wrote {} files under {}", files.len(), output);
        }
        _ => {
            print_usage();
            return Err(format!("Unknown command or missing output: {}", args[1]).into());
        }
    }

    Ok(())
}
