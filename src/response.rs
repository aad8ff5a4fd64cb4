/// Written to every connection that becomes readable. Request bytes are never
/// inspected.
pub static RESPONSE: &[u8] =
    b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 11\r\n\r\nhelloworld\n";
