// Build script generating the fixture query builder from schema/schema.json

use gryphin_schema::{scalars, ScalarOverride, ScalarSource};
use std::error::Error;
use std::path::{Path, PathBuf};

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=schema");

    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?);
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);
    let schema_dir = manifest_dir.join("schema");
    let file = |name: &str| ScalarSource::File(schema_dir.join("scalars").join(name));

    let mut graph = gryphin_schema::ingest(&std::fs::read_to_string(
        schema_dir.join("schema.json"),
    )?)?;

    // Built-ins keep their alias, and a replaced override must not leak into
    // the output: either file would redefine a type alias.
    let overrides = [
        ScalarOverride::new("ID", file("id.rs")),
        ScalarOverride::new("DateTime", file("replaced.rs")),
        ScalarOverride::new("DateTime", file("date_time.rs")),
        ScalarOverride::new(
            "Url",
            ScalarSource::Inline("pub type Url = ::std::string::String;".to_string()),
        ),
    ];
    scalars::merge(&overrides, &mut graph);

    let mut output = gryphin_codegen::generate(&graph);
    output.append_file_overrides(&graph, &overrides, &|path: &Path| {
        std::fs::read_to_string(path)
    })?;

    let generated = out_dir.join("generated");
    std::fs::create_dir_all(&generated)?;
    for unit in output.units() {
        std::fs::write(generated.join(&unit.relative_path), &unit.content)?;
    }

    let module = generated.join("mod.rs").display().to_string();
    std::fs::write(
        out_dir.join("generated.rs"),
        format!("#[allow(clippy::pedantic)]\n#[path = {module:?}]\npub mod generated;\n"),
    )?;
    Ok(())
}
