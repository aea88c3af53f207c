mod common;

use common::{create_test_data, setup_temp_dir, small_buffer_config, spawn_receiver, write_source};
use fftc::{Completion, Framing, RawStream, Receiver, Sender, TransferError};
use socket2::SockRef;
use std::io::{self, ErrorKind, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::time::Duration;

/// Close `stream` with an RST instead of a FIN.
fn abort(stream: TcpStream) {
    SockRef::from(&stream)
        .set_linger(Some(Duration::ZERO))
        .expect("set linger");
    drop(stream);
}

#[test]
fn second_listener_on_same_port_reports_port_in_use() {
    let config = small_buffer_config();
    let first = Receiver::bind(0, &config).expect("first bind");
    let port = first.local_addr().port();

    let err = Receiver::bind(port, &config)
        .err()
        .expect("second bind must fail");

    assert!(matches!(err, TransferError::PortInUse { .. }));
    assert_eq!(err.to_string(), format!("port {port} is already in use"));
}

#[test]
fn refused_connection_reports_connect_failed() {
    let dir = setup_temp_dir();
    let source = write_source(&dir, "a.bin", b"data");

    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };

    let err = Sender::new(small_buffer_config().transfer)
        .send_file("127.0.0.1", port, &source, &mut io::sink())
        .expect_err("nothing listens on the port");

    match err {
        TransferError::ConnectFailed { addr, source } => {
            assert_eq!(addr.port(), port);
            assert_eq!(source.kind(), ErrorKind::ConnectionRefused);
        }
        other => panic!("expected ConnectFailed, got {other:?}"),
    }
}

#[test]
fn missing_source_fails_before_connecting() {
    let dir = setup_temp_dir();
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.set_nonblocking(true).expect("nonblocking");
    let port = listener.local_addr().expect("addr").port();

    let err = Sender::new(small_buffer_config().transfer)
        .send_file("127.0.0.1", port, &dir.path().join("missing.bin"), &mut io::sink())
        .expect_err("source does not exist");

    assert!(matches!(err, TransferError::FileNotFound { .. }));
    let accept = listener.accept().err().expect("no connection was made");
    assert_eq!(accept.kind(), ErrorKind::WouldBlock);
}

#[test]
fn directory_source_is_rejected() {
    let dir = setup_temp_dir();

    let err = Sender::new(small_buffer_config().transfer)
        .send_file("127.0.0.1", 9, dir.path(), &mut io::sink())
        .expect_err("directories are not sent");

    assert!(matches!(err, TransferError::NotAFile { .. }));
}

#[test]
fn unresolvable_host_reports_host_unreachable() {
    let dir = setup_temp_dir();
    let source = write_source(&dir, "a.bin", b"data");

    let err = Sender::new(small_buffer_config().transfer)
        .send_file("no-such-host.invalid", 9000, &source, &mut io::sink())
        .expect_err("host cannot resolve");

    assert!(matches!(err, TransferError::HostUnreachable { .. }));
}

#[test]
fn dropped_sender_leaves_truncated_file_with_reported_count() {
    let dir = setup_temp_dir();
    let dest = dir.path().join("b.bin");
    let payload = create_test_data(100_000);

    let run = spawn_receiver(&small_buffer_config(), &dest);

    let mut stream = TcpStream::connect(("127.0.0.1", run.port)).expect("connect");
    stream.write_all(&payload).expect("write payload");
    // Let the receiver drain everything before the reset arrives
    std::thread::sleep(Duration::from_millis(300));
    abort(stream);

    let (result, console) = run.join();
    let summary = result.expect("truncation is not fatal");

    assert!(matches!(summary.completion, Completion::Truncated { .. }));
    assert_eq!(summary.bytes, payload.len() as u64);
    assert_eq!(std::fs::read(&dest).expect("read destination"), payload);
    assert!(console.contains("Connection closed early"));
    assert!(console.contains("100000 bytes written to"));
}

#[test]
fn clean_shutdown_is_a_clean_completion() {
    let dir = setup_temp_dir();
    let dest = dir.path().join("b.bin");

    let run = spawn_receiver(&small_buffer_config(), &dest);

    let mut stream = TcpStream::connect(("127.0.0.1", run.port)).expect("connect");
    stream.write_all(b"all of it").expect("write payload");
    stream
        .shutdown(std::net::Shutdown::Write)
        .expect("shutdown write");

    let summary = run.join().0.expect("receive should succeed");
    assert_eq!(summary.completion, Completion::Clean);
    assert_eq!(summary.bytes, 9);
}

#[test]
fn unwritable_destination_fails_receive() {
    let dir = setup_temp_dir();
    let dest = dir.path().join("no-such-dir").join("b.bin");

    let run = spawn_receiver(&small_buffer_config(), &dest);

    let mut peer = TcpStream::connect(("127.0.0.1", run.port)).expect("connect");

    // The receiver hangs up before reporting the file error
    let mut buf = [0u8; 16];
    match peer.read(&mut buf) {
        Ok(n) => assert_eq!(n, 0, "receiver must not send data"),
        Err(e) => assert!(matches!(
            e.kind(),
            ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted
        )),
    }

    let err = run.join().0.expect_err("destination directory is missing");
    assert!(matches!(err, TransferError::FileNotFound { .. }));
    assert!(!dest.exists());
}

#[test]
fn receiver_reset_mid_send_reports_stream_error() {
    let dir = setup_temp_dir();
    let source = write_source(&dir, "big.bin", &create_test_data(32 * 1024 * 1024));

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    let resetter = std::thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        abort(stream);
    });

    let err = Sender::new(small_buffer_config().transfer)
        .send_file("127.0.0.1", port, &source, &mut io::sink())
        .expect_err("peer reset the connection");
    resetter.join().expect("resetter thread");

    assert!(matches!(err, TransferError::StreamIo { .. }));
}

/// Treats any mid-stream connection error as a failed transfer.
struct StrictFraming;

impl Framing for StrictFraming {
    fn finish_send(&self, stream: &TcpStream) -> io::Result<()> {
        RawStream.finish_send(stream)
    }

    fn on_stream_error(&self, error: io::Error, _received: u64) -> Result<Completion, io::Error> {
        Err(error)
    }
}

#[test]
fn framing_can_escalate_dropped_connection() {
    let dir = setup_temp_dir();
    let dest = dir.path().join("b.bin");

    let receiver = Receiver::bind(0, &small_buffer_config())
        .expect("bind")
        .with_framing(StrictFraming);
    let port = receiver.local_addr().port();
    let handle = std::thread::spawn(move || receiver.receive_file(&dest, &mut io::sink()));

    let mut stream = TcpStream::connect(("127.0.0.1", port)).expect("connect");
    stream.write_all(&[7u8; 2048]).expect("write payload");
    std::thread::sleep(Duration::from_millis(300));
    abort(stream);

    let err = handle
        .join()
        .expect("receiver thread")
        .expect_err("strict framing escalates");
    assert!(matches!(err, TransferError::StreamIo { transferred: 2048, .. }));
}
