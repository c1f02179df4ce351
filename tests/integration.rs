/// Integration tests for flexnet

use flexnet::format::{ACK, CR, LF, NAK};
use flexnet::*;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::{tempdir, TempDir};

type TestServer = Server<LocalFs, Cursor<Vec<u8>>, Vec<u8>>;

fn server_in(dir: &Path, input: Vec<u8>) -> TestServer {
    let _ = env_logger::builder().is_test(true).try_init();
    let session = Session::new(LocalFs::new(dir).expect("Failed to open directory"));
    Server::new(session, Channel::new(Cursor::new(input), Vec::new()))
}

fn run(dir: &Path, input: Vec<u8>) -> (Shutdown, Vec<u8>) {
    let mut server = server_in(dir, input);
    let shutdown = server.serve().expect("Server failed");
    let (_, channel) = server.into_parts();
    (shutdown, channel.into_writer().expect("Failed to collect output"))
}

fn disk_dir() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");
    FlexImageBuilder::new()
        .label("WORK")
        .save(dir.path().join("WORK.DSK"))
        .expect("Failed to create image");
    dir
}

fn write_request(track: u8, sector: u8, data: &[u8; SECTOR_SIZE], sum: u16) -> Vec<u8> {
    let mut input = vec![b'R', 0, track, sector];
    input.extend_from_slice(data);
    input.extend_from_slice(&sum.to_be_bytes());
    input
}

fn pattern() -> [u8; SECTOR_SIZE] {
    let mut data = [0u8; SECTOR_SIZE];
    for (i, b) in data.iter_mut().enumerate() {
        *b = (i * 7) as u8;
    }
    data
}

#[test]
fn test_write_then_read_round_trip() {
    let dir = disk_dir();
    let data = pattern();

    let mut input = b"MWORK\r".to_vec();
    input.extend(write_request(3, 4, &data, checksum(&data)));
    input.extend_from_slice(&[b's', 0, 3, 4, ACK]);

    let (_, out) = run(dir.path(), input);

    assert_eq!(&out[..3], &[ACK, b'W', ACK]);
    let frame = &out[3..];
    assert_eq!(frame.len(), SECTOR_SIZE + 2);
    assert_eq!(&frame[..SECTOR_SIZE], &data[..]);
    assert_eq!(&frame[SECTOR_SIZE..], &checksum(&data).to_be_bytes());

    // The data really is on disk
    let raw = fs::read(dir.path().join("WORK.DSK")).unwrap();
    let block = 10 + 2 * 10 + 4 - 1;
    assert_eq!(&raw[block * SECTOR_SIZE..(block + 1) * SECTOR_SIZE], &data[..]);
}

#[test]
fn test_bad_checksum_leaves_sector_unchanged() {
    let dir = disk_dir();
    let before = fs::read(dir.path().join("WORK.DSK")).unwrap();
    let data = pattern();

    let mut input = b"MWORK\r".to_vec();
    input.extend(write_request(3, 4, &data, checksum(&data).wrapping_add(1)));

    let (_, out) = run(dir.path(), input);
    assert_eq!(out, vec![ACK, b'W', NAK]);

    let after = fs::read(dir.path().join("WORK.DSK")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_write_invalid_address_nak() {
    let dir = disk_dir();
    let data = [0x11u8; SECTOR_SIZE];

    let mut input = b"MWORK\r".to_vec();
    input.extend(write_request(200, 1, &data, checksum(&data)));
    let (_, out) = run(dir.path(), input);
    assert_eq!(out, vec![ACK, b'W', NAK]);
}

#[test]
fn test_write_without_mount_nak() {
    let dir = disk_dir();
    let data = [0x11u8; SECTOR_SIZE];
    let (_, out) = run(dir.path(), write_request(1, 1, &data, checksum(&data)));
    assert_eq!(out, vec![NAK]);
}

#[test]
fn test_read_without_mount_forces_checksum_error() {
    let dir = disk_dir();
    let (_, out) = run(dir.path(), vec![b'S', 0, 1, 1, NAK, b'Q']);

    assert_eq!(out.len(), SECTOR_SIZE + 2 + 1 + 1);
    assert!(out[..SECTOR_SIZE + 2].iter().all(|&b| b == 0));
    assert_eq!(out[SECTOR_SIZE + 2], 0x01);
    // The NAK was consumed, so the next byte is a fresh command
    assert_eq!(out[SECTOR_SIZE + 3], ACK);
}

#[test]
fn test_track0_alias() {
    let dir = disk_dir();
    let input = vec![
        b'M', b'W', b'O', b'R', b'K', CR, b'S', 0, 0, 0, ACK, b'S', 0, 0, 1, ACK,
    ];
    let (_, out) = run(dir.path(), input);
    let frames = &out[2..];
    assert_eq!(frames.len(), 2 * (SECTOR_SIZE + 2));
    assert_eq!(&frames[..SECTOR_SIZE + 2], &frames[SECTOR_SIZE + 2..]);
}

#[test]
fn test_mount_read_only() {
    let dir = disk_dir();
    let path = dir.path().join("WORK.DSK");
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_readonly(true);
    fs::set_permissions(&path, perms).unwrap();

    let data = [0x22u8; SECTOR_SIZE];
    let mut input = b"MWORK\r".to_vec();
    input.extend(write_request(1, 1, &data, checksum(&data)));
    let (_, out) = run(dir.path(), input);
    assert_eq!(out, vec![ACK, b'R', NAK]);
}

#[test]
fn test_mount_lowercase_image() {
    let dir = tempdir().unwrap();
    FlexImageBuilder::new()
        .save(dir.path().join("lower.dsk"))
        .unwrap();
    let (_, out) = run(dir.path(), b"Mlower\r".to_vec());
    assert_eq!(out, vec![ACK, b'W']);
}

#[test]
fn test_mount_invalid_image_unmounts() {
    let dir = disk_dir();
    fs::write(dir.path().join("JUNK.DSK"), vec![0u8; 10 * SECTOR_SIZE]).unwrap();

    let mut server = server_in(dir.path(), b"MWORK\rMJUNK\r".to_vec());
    server.serve().unwrap();
    assert!(!server.session().is_ready());
    let (_, channel) = server.into_parts();
    assert_eq!(channel.into_writer().unwrap(), vec![ACK, b'W', NAK]);
}

#[test]
fn test_list_images_end_to_end() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("A.DSK"), b"").unwrap();
    fs::write(dir.path().join("b.dsk"), b"").unwrap();
    fs::write(dir.path().join("readme.txt"), b"").unwrap();

    let (_, out) = run(dir.path(), b"A\r   ".to_vec());

    let mut expected = vec![CR, LF];
    expected.extend_from_slice(b"A.DSK\r\n");
    expected.extend_from_slice(b"b.dsk\r\n");
    expected.push(ACK);
    assert_eq!(out, expected);
}

#[test]
fn test_list_directories_end_to_end() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("games")).unwrap();
    fs::write(dir.path().join("A.DSK"), b"").unwrap();

    let (_, out) = run(dir.path(), b"I\r   ".to_vec());
    assert_eq!(out, b"\r\ngames\r\n\x06");
}

#[test]
fn test_change_directory_and_query() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    FlexImageBuilder::new()
        .save(dir.path().join("sub").join("INNER.DSK"))
        .unwrap();
    let sub = fs::canonicalize(dir.path().join("sub")).unwrap();

    let (_, out) = run(dir.path(), b"Psub\r?PNOPE\r?MINNER\r".to_vec());

    let mut expected = vec![ACK];
    expected.extend_from_slice(sub.display().to_string().as_bytes());
    expected.extend_from_slice(&[CR, ACK, NAK]);
    expected.extend_from_slice(sub.display().to_string().as_bytes());
    expected.extend_from_slice(&[CR, ACK, ACK, b'W']);
    assert_eq!(out, expected);
}

#[test]
fn test_full_session_exit() {
    let dir = disk_dir();
    let (shutdown, out) = run(dir.path(), b"\x55\xaaQVA:\rMWORK\rE\x55".to_vec());
    assert_eq!(shutdown, Shutdown::Exit);
    assert_eq!(out, vec![0x55, 0xAA, ACK, ACK, ACK, b'W', ACK]);
}

#[test]
fn test_end_of_stream() {
    let dir = disk_dir();
    let (shutdown, out) = run(dir.path(), b"Q".to_vec());
    assert_eq!(shutdown, Shutdown::Disconnected);
    assert_eq!(shutdown.exit_code(), 1);
    assert_eq!(out, vec![ACK]);
}

#[test]
fn test_open_double_density_image() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("DD.DSK");
    FlexImageBuilder::new()
        .max_track(79)
        .sectors_per_track(36)
        .track0_sectors(20)
        .save(&path)
        .unwrap();

    let image = DiskImage::open(&path).expect("Failed to open image");
    assert_eq!(image.geometry().kind, GeometryKind::DoubleDensity);
    assert_eq!(image.block_index(1, 1).unwrap(), 20);
    assert_eq!(image.block_index(79, 36).unwrap(), 20 + 78 * 36 + 35);
}

#[test]
fn test_oversized_image_trailing_track() {
    let dir = tempdir().unwrap();
    // 10 full tracks plus 14 sectors: one normal track 0 and 4 sectors of track 11
    let mut data = FlexImageBuilder::new()
        .max_track(10)
        .sectors_per_track(10)
        .build();
    data.resize(114 * SECTOR_SIZE, 0);
    data[113 * SECTOR_SIZE..].fill(0x5A);
    fs::write(dir.path().join("BIG.DSK"), data).unwrap();

    let mut input = b"MBIG\r".to_vec();
    input.extend_from_slice(&[b's', 0, 11, 4, ACK, b's', 0, 11, 5, ACK]);
    let (_, out) = run(dir.path(), input);

    assert_eq!(&out[..2], &[ACK, b'W']);
    let (stored, missing) = out[2..].split_at(SECTOR_SIZE + 2);
    assert_eq!(&stored[..SECTOR_SIZE], &[0x5Au8; SECTOR_SIZE][..]);
    assert_eq!(&stored[SECTOR_SIZE..], &checksum(&[0x5A; SECTOR_SIZE]).to_be_bytes());
    // Past the end of the file
    assert_eq!(missing, &[0u8; SECTOR_SIZE + 2][..]);
}

#[test]
fn test_change_directory_empty_name() {
    let dir = tempdir().unwrap();
    let (_, out) = run(dir.path(), b"P\r".to_vec());
    assert_eq!(out, vec![NAK]);
}
