#![cfg(not(tarpaulin_include))]

use crossword::compiler::Direction;
use crossword::config::EditorConfig;
use crossword::editor::{GridEditor, Tool};
use crossword::puzzle::Puzzle;
use crossword::saving::{load_puzzle, save_puzzle};
use std::env;
use std::io::{self, Write};
use std::time::Instant;

fn parse_cell(editor: &GridEditor, arg: &str) -> Option<usize> {
    if let Some((r, c)) = arg.split_once(',') {
        let row: usize = r.trim().parse().ok()?;
        let col: usize = c.trim().parse().ok()?;
        if row < editor.size && col < editor.size {
            return Some(row * editor.size + col);
        }
        return None;
    }
    arg.trim().parse().ok()
}

fn print_entries(editor: &GridEditor) {
    match editor.compile() {
        Ok(grid) => {
            for direction in [Direction::Across, Direction::Down] {
                println!("{:?}:", direction);
                for entry in grid.entries(direction) {
                    println!("  {:>4}  start {:>3}  len {:>2}  {:?}", entry.id(), entry.start, entry.len, entry.cells);
                }
            }
        }
        Err(e) => println!("{}", e),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let s = Instant::now();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <size> [r|h|v|all|none]", args[0]);
        return Ok(());
    }

    let config = EditorConfig::from_params(Some(&args[1]), args.get(2).map(String::as_str));
    let mut editor = GridEditor::new(config);
    let mut start_time = Instant::now();
    let mut status = String::from("ok");
    let mut show = true;

    println!("{}x{} grid, symmetry: {}", editor.size, editor.size, editor.label());
    loop {
        if show {
            editor.display();
        }

        let elapsed_time = start_time.elapsed().as_secs_f64();
        print!("[{:.1}] ({}) > ", elapsed_time, status);
        io::stdout().flush()?;

        let mut command = String::new();
        if io::stdin().read_line(&mut command)? == 0 {
            break;
        }
        let command = command.trim();
        start_time = Instant::now();

        if command.is_empty() {
            status = String::from("invalid command");
            continue;
        }

        let (verb, arg) = command.split_once(' ').unwrap_or((command, ""));
        match verb {
            "help" => {
                println!("Commands:");
                println!("  q: Quit");
                println!("  b <cell>: Paint block (with symmetry)");
                println!("  w <cell>: Paint white (with symmetry)");
                println!("  g <cell>: Toggle grey shading on one cell");
                println!("  o <cell>: Toggle bubble on one cell");
                println!("  <cell> is an index or row,col");
                println!("  clear_blocks / clear_styles");
                println!("  entries: List across and down entries");
                println!("  encode: Print the base64 grid");
                println!("  save <file> / load <file>");
                println!("  disable_output / enable_output");
                continue;
            }
            "q" => break,
            "disable_output" => {
                show = false;
                status = String::from("ok");
            }
            "enable_output" => {
                show = true;
                status = String::from("ok");
            }
            "clear_blocks" => {
                editor.clear_blocks();
                status = String::from("ok");
            }
            "clear_styles" => {
                editor.clear_styles();
                status = String::from("ok");
            }
            "entries" => {
                print_entries(&editor);
                status = String::from("ok");
            }
            "encode" => {
                println!("{}", editor.encoded());
                status = String::from("ok");
            }
            "save" if !arg.is_empty() => {
                status = match Puzzle::from_editor(&editor, "")
                    .map_err(|e| e.to_string())
                    .and_then(|p| save_puzzle(&p, arg).map_err(|e| e.to_string()))
                {
                    Ok(()) => String::from("ok"),
                    Err(e) => e,
                };
            }
            "load" if !arg.is_empty() => {
                status = match load_puzzle(arg) {
                    Ok(puzzle) => match GridEditor::from_puzzle(&puzzle) {
                        Ok(loaded) => {
                            editor = loaded;
                            String::from("ok")
                        }
                        Err(e) => e.to_string(),
                    },
                    Err(e) => e.to_string(),
                };
            }
            _ => match (Tool::from_key(verb), parse_cell(&editor, arg)) {
                (Some(tool), Some(index)) => {
                    status = match editor.apply(tool, index) {
                        Ok(_) => String::from("ok"),
                        Err(e) => e.to_string(),
                    };
                }
                (Some(_), None) => status = String::from("invalid cell"),
                _ => status = String::from("invalid command"),
            },
        }
    }

    let e = s.elapsed().as_secs_f64();
    println!("Total elapsed time: {:.1} seconds", e);

    Ok(())
}
