//! Interactive probe for the whole pipeline: type a WHERE clause (or a
//! full SELECT), see the parsed filter tree, its SQL rendering, and its
//! JSON where-filter document.

use metasift::{
    backends::json,
    core::{compile::Compiled, value::Scalar},
    sql::{
        compile::{SqlCompiler, quote_ident},
        parse::parse_filter,
    },
};
use rustyline::{DefaultEditor, error::ReadlineError};

fn main() -> rustyline::Result<()> {
    println!("metasift {} filter shell", metasift::VERSION);
    println!("type a WHERE clause; empty line or Ctrl-D exits");

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("filter> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    break;
                }
                editor.add_history_entry(line)?;
                render(line);
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err),
        }
    }

    Ok(())
}

fn render(line: &str) {
    let filter = match parse_filter(line) {
        Ok(filter) => filter,
        Err(err) => {
            println!("  parse: {err}");
            return;
        }
    };
    println!("  tree: {filter:?}");

    let compiler = SqlCompiler::new(|key: &str, _: &Scalar| quote_ident(key));
    match compiler.to_where_clause(&filter) {
        Ok(clause) => println!("  sql:  WHERE {clause}"),
        Err(err) => println!("  sql:  {err}"),
    }

    match json::compile(&filter) {
        Ok(Compiled::Clause(doc)) => match serde_json::to_string_pretty(&doc) {
            Ok(body) => println!("  json: {body}"),
            Err(err) => println!("  json: {err}"),
        },
        Ok(Compiled::AllRows) => println!("  json: matches every row; send no filter"),
        Ok(Compiled::NoRows) => println!("  json: matches no row; skip the query"),
        Err(err) => println!("  json: {err}"),
    }
}
