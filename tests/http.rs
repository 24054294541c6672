use once_cell::sync::Lazy;
use reqwest::{redirect, Client, StatusCode};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_db_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("study_log_http_{}_{}.db", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

// Clients never follow redirects so the tests can assert on the 302 itself.
fn no_redirect_client() -> Client {
    Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .expect("build client")
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(base_url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let db_path = unique_db_path();
    let child = Command::new(env!("CARGO_BIN_EXE_study_log"))
        .env("PORT", port.to_string())
        .env("APP_DB_PATH", db_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

#[tokio::test]
async fn http_save_subject_rejects_empty_subject() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = no_redirect_client();

    let response = client
        .post(format!("{}/save-subject", server.base_url))
        .form(&[("subject", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_save_log_rejects_non_integer_duration() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = no_redirect_client();

    let response = client
        .post(format!("{}/save-log", server.base_url))
        .form(&[("subject", "1"), ("duration", "abc")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_save_log_rejects_non_numeric_subject_id() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = no_redirect_client();

    let response = client
        .post(format!("{}/save-log", server.base_url))
        .form(&[("subject", "Math"), ("duration", "2")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_get_on_save_routes_is_method_not_allowed() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = no_redirect_client();

    for path in ["/save-subject", "/save-log"] {
        let response = client
            .get(format!("{}{path}", server.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{path}");
    }
}

#[tokio::test]
async fn http_end_to_end_subject_log_and_summary() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = no_redirect_client();

    let response = client
        .post(format!("{}/save-subject", server.base_url))
        .form(&[("subject", "Math")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()["location"], "/");

    let response = client
        .post(format!("{}/save-log", server.base_url))
        .form(&[("subject", "1"), ("duration", "3")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()["location"], "/");

    let index = client
        .get(&server.base_url)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(index.contains("Math"));
    assert!(index.contains("<td>3</td>"));
    assert!(index.contains("Latest logs: 1"));

    let summary = client
        .get(format!("{}/summary", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(summary.contains("<td>Math</td><td>3 hours</td><td>3 hours</td>"));

    // Fill past the recent-logs cap and check the list page stays at 10 rows.
    for _ in 0..11 {
        let response = client
            .post(format!("{}/save-log", server.base_url))
            .form(&[("subject", "1"), ("duration", "1")])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
    }

    let index = client
        .get(&server.base_url)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(index.matches("log-row").count(), 10);
    assert!(index.contains("Latest logs: 10"));
}
