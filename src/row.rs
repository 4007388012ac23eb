//! The fixed-width row format.
//!
//! A row is stored as a single 293-byte block: the id, then the username
//! field, then the email field, each at a fixed offset with no length
//! prefix. Strings shorter than their field are zero-padded, so decoding
//! stops at the first NUL byte.

pub const ID_SIZE: usize = 4;
/// Serialized width of the username field: 32 bytes of text plus a NUL.
pub const USERNAME_SIZE: usize = 33;
/// Serialized width of the email field: 255 bytes of text plus a NUL.
pub const EMAIL_SIZE: usize = 256;

pub const ID_OFFSET: usize = 0;
pub const USERNAME_OFFSET: usize = ID_OFFSET + ID_SIZE;
pub const EMAIL_OFFSET: usize = USERNAME_OFFSET + USERNAME_SIZE;
pub const ROW_SIZE: usize = ID_SIZE + USERNAME_SIZE + EMAIL_SIZE;

/// A single record of the one table this store manages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: u32,
    pub username: String,
    pub email: String,
}

/// Write `row` into a buffer at least `ROW_SIZE` bytes long.
pub fn serialize_row(row: &Row, buf: &mut [u8]) {
    buf[ID_OFFSET..ID_OFFSET + ID_SIZE].copy_from_slice(&row.id.to_le_bytes());
    write_text(
        &mut buf[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE],
        &row.username,
    );
    write_text(&mut buf[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE], &row.email);
}

/// Read a row back out of a buffer written by [`serialize_row`].
pub fn deserialize_row(buf: &[u8]) -> Row {
    let id = u32::from_le_bytes([
        buf[ID_OFFSET],
        buf[ID_OFFSET + 1],
        buf[ID_OFFSET + 2],
        buf[ID_OFFSET + 3],
    ]);
    let username = read_text(&buf[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE]);
    let email = read_text(&buf[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE]);
    Row {
        id,
        username,
        email,
    }
}

// The last byte of each text field stays NUL, like a C string's terminator.
fn write_text(field: &mut [u8], value: &str) {
    let bytes = value.as_bytes();
    let len = bytes.len().min(field.len() - 1);
    field[..len].copy_from_slice(&bytes[..len]);
    field[len..].fill(0);
}

fn read_text(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}
