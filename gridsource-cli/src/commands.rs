//! Subcommand implementations.

use std::path::PathBuf;
use std::time::Duration;

use gridsource_lib::Datasource;
use gridsource_lib::DatasourceConfig;
use gridsource_lib::FakeServer;
use gridsource_lib::error::DatasourceError;
use gridsource_lib::layout::ColumnState;
use gridsource_lib::layout::LayoutPersistence;
use gridsource_lib::layout::SqliteLayoutStore;
use gridsource_lib::loader::DatasetLoader;
use gridsource_lib::loader::Source;
use gridsource_lib::model::row_id_string;
use gridsource_lib::query::ColumnVo;
use gridsource_lib::query::Pagination;
use gridsource_lib::query::Request;
use gridsource_lib::query::Response;
use log::info;

use crate::cli::Command;
use crate::cli::LayoutCommand;
use crate::cli::QueryArgs;
use crate::error::CliError;
use crate::paths;

pub async fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Query(args) => query(args).await,
        Command::Columns { source } => columns(&source).await,
        Command::Layout { command, db } => layout(command, db).await,
    }
}

async fn query(args: QueryArgs) -> Result<(), CliError> {
    let loader = DatasetLoader::new();
    let mut server = FakeServer::new(loader.load_rows(&args.source).await?);
    if let Some(columns) = &args.columns {
        let defs = loader.load_column_defs(columns).await?;
        server = server.with_comparators(defs.comparators());
    }
    info!("Serving {} rows from {}", server.len(), args.source);

    let config = DatasourceConfig::default().with_latency(Duration::from_millis(args.latency_ms));
    let datasource = Datasource::new(server).with_config(config);

    let response = match datasource.fetch_rows(build_request(&args)).await {
        Ok(block) => Response {
            success: true,
            rows: block.row_data,
            last_row: block.row_count,
        },
        Err(DatasourceError::Failed) => Response::failed(),
        Err(err) => return Err(err.into()),
    };

    if args.ids {
        print_ids(&response);
    } else {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }
    Ok(())
}

fn build_request(args: &QueryArgs) -> Request {
    let mut request = Request::range(args.start, args.end);
    request.sort_model = args.sort.clone();
    for filter in &args.filter {
        request = request.filter(filter.column.clone(), filter.spec.clone());
    }
    request.row_group_cols = args.group_by.iter().map(ColumnVo::new).collect();
    request.group_keys = args.group_key.clone();
    request.value_cols = args.agg.clone();

    match args.page {
        Some(page) => Pagination::new(args.page_size).request_for_page(page, &request),
        None => request,
    }
}

fn print_ids(response: &Response) {
    if !response.success {
        println!("request failed");
        return;
    }
    let ids: Vec<String> = response.rows.iter().map(row_id_string).collect();
    println!("{}", ids.join(" "));
    match response.last_row {
        Some(n) => println!("lastRow: {}", n),
        None => println!("lastRow: unknown"),
    }
}

async fn columns(source: &Source) -> Result<(), CliError> {
    let defs = DatasetLoader::new().load_column_defs(source).await?;

    for group in defs.groups() {
        if group.header_name.is_empty() {
            println!("(no group)");
        } else {
            println!("{}", group.header_name);
        }

        for column in &group.children {
            let mut notes = Vec::new();
            if let Some(renderer) = column.cell_renderer {
                notes.push(format!("renderer={}", renderer.name()));
            }
            if let Some(comparator) = column.comparator {
                notes.push(format!("comparator={}", comparator.name()));
            }
            if column.lock_position {
                notes.push("locked".to_string());
            }
            if column.hide {
                notes.push("hidden".to_string());
            }
            if !column.sortable {
                notes.push("unsortable".to_string());
            }
            println!("  {:<16} {}", column.col_id, notes.join(" "));
        }
    }
    Ok(())
}

async fn layout(command: LayoutCommand, db: Option<PathBuf>) -> Result<(), CliError> {
    let path = db.or_else(paths::layout_db).ok_or(CliError::NoDataDir)?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let layouts = LayoutPersistence::new(SqliteLayoutStore::open(&path).await?);

    match command {
        LayoutCommand::Save { file, reset } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .map_err(|source| CliError::ReadFile {
                    path: file.clone(),
                    source,
                })?;
            let state: Vec<ColumnState> = serde_json::from_str(&text)?;
            if reset {
                layouts.save_reset_layout(&state).await?;
            } else {
                layouts.save(&state).await?;
            }
            info!("Saved {} layout of {} columns to {}", layout_kind(reset), state.len(), path.display());
        }
        LayoutCommand::Show { reset } => {
            let state = if reset {
                layouts.reset().await
            } else {
                layouts.restore().await
            };
            let state = state.ok_or(CliError::NoLayout(layout_kind(reset)))?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        LayoutCommand::Apply { columns, reset } => {
            let defs = DatasetLoader::new().load_column_defs(&columns).await?;
            let mut model = defs.column_model();
            let applied = if reset {
                layouts.reset_into(&mut model).await
            } else {
                layouts.restore_into(&mut model).await
            };
            if !applied {
                return Err(CliError::NoLayout(layout_kind(reset)));
            }
            println!("{}", serde_json::to_string_pretty(&model.column_state())?);
        }
        LayoutCommand::Clear => layouts.clear().await?,
    }
    Ok(())
}

fn layout_kind(reset: bool) -> &'static str {
    if reset { "reset" } else { "saved" }
}
