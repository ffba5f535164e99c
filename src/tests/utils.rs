use crate::config::Config;
use crate::db::connection::{init_db, Database};
use crate::scraper::{FetchOutcome, PageSource};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Unique path under the temp dir; tests run in parallel.
pub fn temp_path(prefix: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!(
        "{prefix}_{}_{nanos}_{n}.{ext}",
        std::process::id()
    ))
}

/// Fresh database with the production schema applied.
pub fn init_test_db() -> Database {
    let path = temp_path("annonces_test", "sqlite");
    let db = Database::new(path.to_string_lossy().to_string());
    init_db(&db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    db
}

pub fn test_config(base_url: &str) -> Config {
    Config {
        base_url: base_url.to_string(),
        database_path: temp_path("pipeline_db", "sqlite")
            .to_string_lossy()
            .to_string(),
        csv_path: temp_path("pipeline_csv", "csv"),
        fetch_timeout: Duration::from_secs(5),
        page_delay: Duration::ZERO,
        max_pages: None,
        bind_addr: "127.0.0.1:0".to_string(),
        write_store: true,
        write_csv: true,
    }
}

pub struct RowSpec<'a> {
    pub location: &'a str,
    pub property_type: &'a str,
    pub title: &'a str,
    pub href: &'a str,
    pub price: &'a str,
    pub date: &'a str,
}

/// A 13-cell row laid out like the site's results table.
pub fn listing_row(row: &RowSpec) -> String {
    let mut cells = vec!["<td></td>".to_string(); 13];
    cells[1] = format!("<td><a href=\"/region\">{}</a></td>", row.location);
    cells[5] = format!("<td>{}</td>", row.property_type);
    cells[7] = format!("<td><a href=\"{}\">{}</a></td>", row.href, row.title);
    cells[9] = format!("<td>{}</td>", row.price);
    cells[11] = format!("<td>{}</td>", row.date);
    format!("<tr>{}</tr>", cells.join(""))
}

pub fn sample_row(n: usize) -> String {
    listing_row(&RowSpec {
        location: "Tunis",
        property_type: "Appartement",
        title: &format!("S+2 number {n}"),
        href: &format!("/Details_Annonces_Immobilier.asp?cod_ann={n}"),
        price: "250 000 DT",
        date: "05/03/2024",
    })
}

/// Page with a header row and a separator row around `rows`.
pub fn page_html(rows: &[String]) -> String {
    format!(
        "<html><body><table>\
         <tr><th>Region</th><th>Nature</th><th>Texte</th><th>Prix</th></tr>\
         {}\
         <tr><td colspan=\"13\">&nbsp;</td></tr>\
         </table></body></html>",
        rows.join("")
    )
}

/// In-memory pages keyed by page number; records every URL asked for.
pub struct FakeSource {
    pages: HashMap<u32, FetchOutcome>,
    pub requested: RefCell<Vec<String>>,
}

impl FakeSource {
    pub fn new(pages: Vec<(u32, FetchOutcome)>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.requested.borrow().len()
    }
}

impl PageSource for FakeSource {
    fn fetch_page(&self, url: &str) -> FetchOutcome {
        self.requested.borrow_mut().push(url.to_string());
        let page = page_number(url).unwrap_or(0);
        self.pages
            .get(&page)
            .cloned()
            .unwrap_or_else(|| FetchOutcome::Success(page_html(&[])))
    }
}

pub fn page_number(url: &str) -> Option<u32> {
    let idx = url.find("rech_page_num=")?;
    url[idx + "rech_page_num=".len()..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .ok()
}

/// Minimal HTTP/1.1 responder on a random local port.
pub struct FakeSite {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<String>>>,
}

pub fn serve_pages(pages: Vec<(u32, u16, String)>) -> FakeSite {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let pages: HashMap<u32, (u16, String)> =
        pages.into_iter().map(|(p, s, b)| (p, (s, b))).collect();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let Some(path) = read_request_path(&mut stream) else { continue };
            seen.lock().unwrap().push(path.clone());

            let (status, body) = page_number(&path)
                .and_then(|p| pages.get(&p).cloned())
                .unwrap_or_else(|| (200, page_html(&[])));
            let _ = write_response(&mut stream, status, &body);
        }
    });

    FakeSite {
        base_url: format!(
            "http://127.0.0.1:{port}/AnnoncesImmobilier.asp?rech_cod_cat=1&rech_cod_pay=TN"
        ),
        requests,
    }
}

/// Serves the same raw body to every request, with the given content type.
pub fn serve_bytes(content_type: &str, body: Vec<u8>) -> FakeSite {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let content_type = content_type.to_string();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let Some(path) = read_request_path(&mut stream) else { continue };
            seen.lock().unwrap().push(path);

            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream
                .write_all(head.as_bytes())
                .and_then(|_| stream.write_all(&body))
                .and_then(|_| stream.flush());
        }
    });

    FakeSite {
        base_url: format!("http://127.0.0.1:{port}/AnnoncesImmobilier.asp?rech_cod_cat=1"),
        requests,
    }
}

fn read_request_path(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let head = String::from_utf8_lossy(&buf);
    head.lines()
        .next()?
        .split_whitespace()
        .nth(1)
        .map(str::to_string)
}

fn write_response(stream: &mut TcpStream, status: u16, body: &str) -> std::io::Result<()> {
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };
    write!(
        stream,
        "HTTP/1.1 {status} {reason}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )?;
    stream.flush()
}

pub fn read_body(resp: astra::Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}
