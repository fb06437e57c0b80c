//! A minimal self-describing binary container for saving/loading arrays.
//!
//! Not a general-purpose container library -- a thin stand-in for the
//! original's HDF5-backed blob writer, scaled down to what the core needs:
//! one array per file, a fixed 8-byte magic+version header, a fixed 8-byte
//! ASCII section name matching the external dataset names (`/indx`,
//! `/elem`, `/upkd`, `/perm`), a little-endian `u64` element count, and the
//! raw little-endian element words.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::packed::PackedIndex;
use crate::perm::Permutation;
use crate::unpacked::UnpackedIndex;
use crate::{Elem, Word};

const MAGIC: &[u8; 8] = b"COOTSR01";

fn section_name(name: &str) -> [u8; 8] {
    let bytes = name.as_bytes();
    assert!(bytes.len() <= 8, "section name does not fit in 8 bytes");
    let mut buf = [0u8; 8];
    buf[..bytes.len()].copy_from_slice(bytes);
    buf
}

fn write_section(path: impl AsRef<Path>, name: &str, count: u64, bytes: &[u8]) -> Result<()> {
    let mut f = File::create(path)?;
    f.write_all(MAGIC)?;
    f.write_all(&section_name(name))?;
    f.write_all(&count.to_le_bytes())?;
    f.write_all(bytes)?;
    Ok(())
}

/// Reads and validates the header, returning the declared element count and
/// the raw payload bytes that follow it.
fn read_section(path: impl AsRef<Path>, expected_name: &str) -> Result<(u64, Vec<u8>)> {
    let mut f = File::open(path)?;

    let mut magic = [0u8; 8];
    f.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(Error::bad_input("not a cootensor blob: bad magic header"));
    }

    let mut name = [0u8; 8];
    f.read_exact(&mut name)?;
    if name != section_name(expected_name) {
        return Err(Error::bad_input(format!(
            "unexpected section name, wanted {expected_name}"
        )));
    }

    let mut count_buf = [0u8; 8];
    f.read_exact(&mut count_buf)?;
    let count = u64::from_le_bytes(count_buf);

    let mut bytes = Vec::new();
    f.read_to_end(&mut bytes)?;
    Ok((count, bytes))
}

fn words_to_bytes(words: &[Word]) -> Vec<u8> {
    let width = std::mem::size_of::<Word>();
    let mut out = Vec::with_capacity(words.len() * width);
    for &w in words {
        out.extend_from_slice(&w.to_le_bytes());
    }
    out
}

fn bytes_to_words(bytes: &[u8]) -> Result<Vec<Word>> {
    let width = std::mem::size_of::<Word>();
    if bytes.len() % width != 0 {
        return Err(Error::bad_input("blob payload not a multiple of the word width"));
    }
    Ok(bytes
        .chunks_exact(width)
        .map(|chunk| {
            let mut buf = [0u8; std::mem::size_of::<Word>()];
            buf.copy_from_slice(chunk);
            Word::from_le_bytes(buf)
        })
        .collect())
}

fn elems_to_bytes(elems: &[Elem]) -> Vec<u8> {
    let width = std::mem::size_of::<Elem>();
    let mut out = Vec::with_capacity(elems.len() * width);
    for &e in elems {
        out.extend_from_slice(&e.to_le_bytes());
    }
    out
}

fn bytes_to_elems(bytes: &[u8]) -> Result<Vec<Elem>> {
    let width = std::mem::size_of::<Elem>();
    if bytes.len() % width != 0 {
        return Err(Error::bad_input("blob payload not a multiple of the element width"));
    }
    Ok(bytes
        .chunks_exact(width)
        .map(|chunk| {
            let mut buf = [0u8; std::mem::size_of::<Elem>()];
            buf.copy_from_slice(chunk);
            Elem::from_le_bytes(buf)
        })
        .collect())
}

/// Saves a [`PackedIndex`] under the `/indx` section name.
pub fn save_indx(path: impl AsRef<Path>, indx: &PackedIndex) -> Result<()> {
    let bytes = words_to_bytes(indx.as_slice());
    write_section(path, "/indx", indx.len() as u64, &bytes)
}

/// Loads a [`PackedIndex`] previously written by [`save_indx`].
pub fn load_indx(path: impl AsRef<Path>) -> Result<PackedIndex> {
    let (count, bytes) = read_section(path, "/indx")?;
    let words = bytes_to_words(&bytes)?;
    if words.len() as u64 != count {
        return Err(Error::bad_input("/indx element count does not match payload length"));
    }
    Ok(PackedIndex::from_words(words))
}

/// Saves an element array under the `/elem` section name.
pub fn save_elem(path: impl AsRef<Path>, elem: &[Elem]) -> Result<()> {
    let bytes = elems_to_bytes(elem);
    write_section(path, "/elem", elem.len() as u64, &bytes)
}

/// Loads an element array previously written by [`save_elem`].
pub fn load_elem(path: impl AsRef<Path>) -> Result<Vec<Elem>> {
    let (count, bytes) = read_section(path, "/elem")?;
    let elems = bytes_to_elems(&bytes)?;
    if elems.len() as u64 != count {
        return Err(Error::bad_input("/elem element count does not match payload length"));
    }
    Ok(elems)
}

/// Saves an [`UnpackedIndex`] under the `/upkd` section name.
pub fn save_upkd(path: impl AsRef<Path>, upkd: &UnpackedIndex) -> Result<()> {
    let bytes = words_to_bytes(upkd.as_slice());
    write_section(path, "/upkd", upkd.as_slice().len() as u64, &bytes)
}

/// Loads an [`UnpackedIndex`] previously written by [`save_upkd`]. The
/// caller must supply `order` (the coordinates-per-row width), since the
/// blob itself only records the flat element count, mirroring the
/// original's "already initialized upkd object" loading convention.
pub fn load_upkd(path: impl AsRef<Path>, order: usize) -> Result<UnpackedIndex> {
    let (count, bytes) = read_section(path, "/upkd")?;
    let words = bytes_to_words(&bytes)?;
    if words.len() as u64 != count {
        return Err(Error::bad_input("/upkd element count does not match payload length"));
    }
    if order == 0 || words.len() % order != 0 {
        return Err(Error::bad_input("/upkd element count is not a multiple of order"));
    }
    Ok(UnpackedIndex::from_raw(words, order))
}

/// Saves a [`Permutation`] under the `/perm` section name. Entries are
/// narrowed to [`Word`] for the fixed-width on-disk representation.
pub fn save_perm(path: impl AsRef<Path>, perm: &Permutation) -> Result<()> {
    let words: Vec<Word> = perm.as_slice().iter().map(|&i| i as Word).collect();
    let bytes = words_to_bytes(&words);
    write_section(path, "/perm", perm.len() as u64, &bytes)
}

/// Loads a [`Permutation`] previously written by [`save_perm`].
pub fn load_perm(path: impl AsRef<Path>) -> Result<Permutation> {
    let (count, bytes) = read_section(path, "/perm")?;
    let words = bytes_to_words(&bytes)?;
    if words.len() as u64 != count {
        return Err(Error::bad_input("/perm element count does not match payload length"));
    }
    let v: Vec<usize> = words.iter().map(|&w| w as usize).collect();
    Ok(Permutation::from_vec(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desc::Descriptor;
    use crate::Word;

    #[test]
    fn indx_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indx.bin");

        let desc = Descriptor::build(&[12, 5, 2]).unwrap();
        let rows: &[[Word; 3]] = &[[4, 3, 0], [4, 1, 1], [0, 5, 1], [9, 1, 0]];
        let indx = PackedIndex::from_rows(&desc, rows).unwrap();

        save_indx(&path, &indx).unwrap();
        let loaded = load_indx(&path).unwrap();
        assert_eq!(loaded, indx);
    }

    #[test]
    fn elem_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("elem.bin");

        let elem: Vec<Elem> = vec![0.10, 0.20, 0.30, 0.40];
        save_elem(&path, &elem).unwrap();
        let loaded = load_elem(&path).unwrap();
        assert_eq!(loaded, elem);
    }

    #[test]
    fn upkd_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upkd.bin");

        let desc = Descriptor::build(&[12, 5, 2]).unwrap();
        let rows: &[[Word; 3]] = &[[4, 3, 0], [9, 1, 0]];
        let indx = PackedIndex::from_rows(&desc, rows).unwrap();
        let upkd = UnpackedIndex::from_packed(&desc, &indx);

        save_upkd(&path, &upkd).unwrap();
        let loaded = load_upkd(&path, desc.order()).unwrap();
        assert_eq!(loaded, upkd);
    }

    #[test]
    fn perm_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("perm.bin");

        let perm = Permutation::from_vec(vec![2, 0, 3, 1]);
        save_perm(&path, &perm).unwrap();
        let loaded = load_perm(&path).unwrap();
        assert_eq!(loaded, perm);
    }

    #[test]
    fn rejects_wrong_section_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("elem.bin");

        let elem: Vec<Elem> = vec![1.0, 2.0];
        save_elem(&path, &elem).unwrap();
        assert!(load_indx(&path).is_err());
    }
}
