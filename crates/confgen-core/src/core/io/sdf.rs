use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::conformer::Conformer;
use crate::core::models::element::{Element, ParseElementError};
use crate::core::models::molecule::{Molecule, MoleculeError};
use crate::core::models::topology::BondOrder;
use crate::core::topology::kekule;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;

const RECORD_TERMINATOR: &str = "$$$$";
const END_OF_BLOCK: &str = "M  END";
const CHARGE_RECORD: &str = "M  CHG";
const PROGRAM_LINE: &str = "  confgen           3D";
const CHARGES_PER_LINE: usize = 8;
const MAX_NAME_LEN: usize = 80;
/// Largest atom or bond count the fixed-width V2000 counts line can hold.
const MAX_V2000_ENTRIES: usize = 999;

#[derive(Debug, Error)]
pub enum SdfError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: SdfParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(&'static str),
    #[error("The input contains no molecule record")]
    Empty,
    #[error("The molecule record declares no atoms")]
    NoAtoms,
    #[error("Atom {atom} ({element}) has valence {valence}, exceeding the allowed maximum of {max}")]
    Valence {
        atom: usize,
        element: Element,
        valence: u8,
        max: u8,
    },
    #[error("Aromatic system around atom {atom} ({element}) has no Kekulé structure; give the missing hydrogen or charge explicitly")]
    AmbiguousAromaticity { atom: usize, element: Element },
    #[error("{count} {block}s do not fit a V2000 connection table (at most {MAX_V2000_ENTRIES})")]
    TooLarge { block: &'static str, count: usize },
}

#[derive(Debug, Error)]
pub enum SdfParseErrorKind {
    #[error("Invalid integer in columns {columns} (value: '{value}')")]
    InvalidInt { columns: &'static str, value: String },
    #[error("Invalid float in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: &'static str, value: String },
    #[error("{0}")]
    InvalidElement(#[from] ParseElementError),
    #[error("Unsupported charge code {0}")]
    InvalidChargeCode(i32),
    #[error("Unsupported bond type {0}")]
    InvalidBondType(i32),
    #[error("Invalid bond: {0}")]
    InvalidBond(#[from] MoleculeError),
    #[error("Malformed '{CHARGE_RECORD}' property line")]
    InvalidChargeRecord,
    #[error("V3000 connection tables are not supported")]
    UnsupportedVersion,
    #[error("Record ended before {expected} {block} lines were read")]
    Truncated {
        block: &'static str,
        expected: usize,
    },
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len()))
        .or_else(|| line.get(start..))
        .unwrap_or("")
        .trim()
}

fn parse_int(
    line: &str,
    line_no: usize,
    start: usize,
    end: usize,
    columns: &'static str,
) -> Result<i32, SdfError> {
    let value = slice_and_trim(line, start, end);
    value.parse::<i32>().map_err(|_| SdfError::Parse {
        line: line_no,
        kind: SdfParseErrorKind::InvalidInt {
            columns,
            value: value.to_string(),
        },
    })
}

fn parse_float(
    line: &str,
    line_no: usize,
    start: usize,
    end: usize,
    columns: &'static str,
) -> Result<f64, SdfError> {
    let value = slice_and_trim(line, start, end);
    value.parse::<f64>().map_err(|_| SdfError::Parse {
        line: line_no,
        kind: SdfParseErrorKind::InvalidFloat {
            columns,
            value: value.to_string(),
        },
    })
}

fn parse_count(
    line: &str,
    line_no: usize,
    start: usize,
    end: usize,
    columns: &'static str,
) -> Result<usize, SdfError> {
    let value = parse_int(line, line_no, start, end, columns)?;
    usize::try_from(value).map_err(|_| SdfError::Parse {
        line: line_no,
        kind: SdfParseErrorKind::InvalidInt {
            columns,
            value: value.to_string(),
        },
    })
}

fn charge_from_ctfile(code: i32) -> Option<i8> {
    match code {
        0 | 4 => Some(0),
        1 => Some(3),
        2 => Some(2),
        3 => Some(1),
        5 => Some(-1),
        6 => Some(-2),
        7 => Some(-3),
        _ => None,
    }
}

fn collect_first_record(reader: &mut impl BufRead) -> Result<Vec<(usize, String)>, SdfError> {
    let mut lines = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let content = line?;
        if content.trim() == RECORD_TERMINATOR {
            break;
        }
        lines.push((i + 1, content));
    }
    Ok(lines)
}

/// MDL V2000 molfile / SD file support.
pub struct SdfFile;

impl SdfFile {
    fn parse_atom(line: &str, line_no: usize) -> Result<Atom, SdfError> {
        let x = parse_float(line, line_no, 0, 10, "1-10")?;
        let y = parse_float(line, line_no, 10, 20, "11-20")?;
        let z = parse_float(line, line_no, 20, 30, "21-30")?;
        let element = Element::from_str(slice_and_trim(line, 31, 34)).map_err(|e| {
            SdfError::Parse {
                line: line_no,
                kind: e.into(),
            }
        })?;

        let charge_field = slice_and_trim(line, 36, 39);
        let charge = if charge_field.is_empty() {
            0
        } else {
            let code = parse_int(line, line_no, 36, 39, "37-39")?;
            charge_from_ctfile(code).ok_or(SdfError::Parse {
                line: line_no,
                kind: SdfParseErrorKind::InvalidChargeCode(code),
            })?
        };

        Ok(Atom::new(element, Point3::new(x, y, z)).with_charge(charge))
    }

    fn parse_bond(
        line: &str,
        line_no: usize,
        molecule: &mut Molecule,
    ) -> Result<(), SdfError> {
        let a1 = parse_count(line, line_no, 0, 3, "1-3")?;
        let a2 = parse_count(line, line_no, 3, 6, "4-6")?;
        let code = parse_int(line, line_no, 6, 9, "7-9")?;
        let order = BondOrder::from_ctfile(code).ok_or(SdfError::Parse {
            line: line_no,
            kind: SdfParseErrorKind::InvalidBondType(code),
        })?;

        // CTfile indices are one-based; zero maps past the end to trip the range check.
        let to_index = |serial: usize| serial.checked_sub(1).unwrap_or(usize::MAX);
        molecule
            .add_bond(to_index(a1), to_index(a2), order)
            .map_err(|e| SdfError::Parse {
                line: line_no,
                kind: e.into(),
            })
    }

    fn parse_charge_record(line: &str, line_no: usize) -> Result<Vec<(usize, i8)>, SdfError> {
        let malformed = || SdfError::Parse {
            line: line_no,
            kind: SdfParseErrorKind::InvalidChargeRecord,
        };
        let tokens: Vec<&str> = line[CHARGE_RECORD.len()..].split_whitespace().collect();
        let (count, rest) = tokens.split_first().ok_or_else(malformed)?;
        let count = count.parse::<usize>().map_err(|_| malformed())?;
        if rest.len() < count * 2 {
            return Err(malformed());
        }
        rest.chunks(2)
            .take(count)
            .map(|pair| {
                let atom = pair[0].parse::<usize>().map_err(|_| malformed())?;
                let charge = pair[1].parse::<i8>().map_err(|_| malformed())?;
                Ok((atom, charge))
            })
            .collect()
    }

    fn validate_valences(molecule: &Molecule) -> Result<(), SdfError> {
        for (index, atom) in molecule.atoms().iter().enumerate() {
            let valence = molecule.explicit_valence(index);
            let max = atom.element.max_valence(atom.formal_charge);
            // Aromatic bonds are counted as 1.5, which overshoots by one for
            // atoms such as pyrrole N-H that take single bonds only.
            let slack = u8::from(
                molecule
                    .bonds_of(index)
                    .any(|b| b.order == BondOrder::Aromatic),
            );
            if valence.saturating_sub(slack) > max {
                return Err(SdfError::Valence {
                    atom: index + 1,
                    element: atom.element,
                    valence,
                    max,
                });
            }
        }
        Ok(())
    }
}

impl MolecularFile for SdfFile {
    type Error = SdfError;

    fn read_from(reader: &mut impl BufRead) -> Result<Molecule, Self::Error> {
        let lines = collect_first_record(reader)?;
        if lines.iter().all(|(_, l)| l.trim().is_empty()) {
            return Err(SdfError::Empty);
        }
        if lines.len() < 4 {
            return Err(SdfError::MissingRecord("counts line"));
        }

        let mut molecule = Molecule::new(lines[0].1.trim());

        let (counts_no, counts_line) = (&lines[3].0, lines[3].1.as_str());
        if counts_line.contains("V3000") {
            return Err(SdfError::Parse {
                line: *counts_no,
                kind: SdfParseErrorKind::UnsupportedVersion,
            });
        }
        let atom_count = parse_count(counts_line, *counts_no, 0, 3, "1-3")?;
        let bond_count = parse_count(counts_line, *counts_no, 3, 6, "4-6")?;
        if atom_count == 0 {
            return Err(SdfError::NoAtoms);
        }

        let atom_start = 4;
        let bond_start = atom_start + atom_count;
        let props_start = bond_start + bond_count;
        let last_line = lines.last().map(|(n, _)| *n).unwrap_or(*counts_no);
        if lines.len() < bond_start {
            return Err(SdfError::Parse {
                line: last_line,
                kind: SdfParseErrorKind::Truncated {
                    block: "atom",
                    expected: atom_count,
                },
            });
        }
        if lines.len() < props_start {
            return Err(SdfError::Parse {
                line: last_line,
                kind: SdfParseErrorKind::Truncated {
                    block: "bond",
                    expected: bond_count,
                },
            });
        }

        for (line_no, line) in &lines[atom_start..bond_start] {
            let atom = Self::parse_atom(line, *line_no)?;
            molecule.add_atom(atom).map_err(|e| SdfError::Parse {
                line: *line_no,
                kind: e.into(),
            })?;
        }

        for (line_no, line) in &lines[bond_start..props_start] {
            Self::parse_bond(line, *line_no, &mut molecule)?;
        }

        let mut charges_reset = false;
        let mut saw_end = false;
        for (line_no, line) in &lines[props_start..] {
            if line.starts_with(END_OF_BLOCK) {
                saw_end = true;
                break;
            }
            if line.starts_with(CHARGE_RECORD) {
                // The first CHG line supersedes every charge given in the atom block.
                if !charges_reset {
                    for index in 0..molecule.atom_count() {
                        if let Some(atom) = molecule.atom_mut(index) {
                            atom.formal_charge = 0;
                        }
                    }
                    charges_reset = true;
                }
                for (serial, charge) in Self::parse_charge_record(line, *line_no)? {
                    let atom = serial
                        .checked_sub(1)
                        .and_then(|index| molecule.atom_mut(index))
                        .ok_or(SdfError::Parse {
                            line: *line_no,
                            kind: SdfParseErrorKind::InvalidChargeRecord,
                        })?;
                    atom.formal_charge = charge;
                }
            }
        }
        if !saw_end {
            return Err(SdfError::MissingRecord(END_OF_BLOCK));
        }

        Self::validate_valences(&molecule)?;
        if let Some(index) = kekule::unassignable_atom(&molecule) {
            return Err(SdfError::AmbiguousAromaticity {
                atom: index + 1,
                element: molecule.atoms()[index].element,
            });
        }
        Ok(molecule)
    }

    fn write_to(molecule: &Molecule, writer: &mut impl Write) -> Result<usize, Self::Error> {
        let mut sdf = SdfWriter::new(writer);
        for conformer in molecule.conformers() {
            sdf.write_conformer(molecule, conformer)?;
        }
        let written = sdf.records_written();
        sdf.finish()?;
        Ok(written)
    }
}

/// Streaming SD file writer producing one record per call.
pub struct SdfWriter<W: Write> {
    inner: W,
    records: usize,
}

impl<W: Write> SdfWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, records: 0 }
    }

    pub fn records_written(&self) -> usize {
        self.records
    }

    /// Flushes buffered output and hands back the underlying writer.
    pub fn finish(mut self) -> Result<W, SdfError> {
        self.inner.flush()?;
        Ok(self.inner)
    }

    /// Writes one record using the coordinates and energy of `conformer`.
    ///
    /// Nothing is written when the molecule is too large for the V2000 counts
    /// line.
    pub fn write_conformer(
        &mut self,
        molecule: &Molecule,
        conformer: &Conformer,
    ) -> Result<(), SdfError> {
        for (block, count) in [("atom", molecule.atom_count()), ("bond", molecule.bond_count())] {
            if count > MAX_V2000_ENTRIES {
                return Err(SdfError::TooLarge { block, count });
            }
        }

        let w = &mut self.inner;
        let name: String = molecule
            .name()
            .chars()
            .filter(|c| *c != '\n' && *c != '\r')
            .take(MAX_NAME_LEN)
            .collect();

        writeln!(w, "{}", name)?;
        writeln!(w, "{}", PROGRAM_LINE)?;
        writeln!(w)?;
        writeln!(
            w,
            "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
            molecule.atom_count(),
            molecule.bond_count()
        )?;

        for (atom, pos) in molecule.atoms().iter().zip(conformer.positions()) {
            writeln!(
                w,
                "{:>10.4}{:>10.4}{:>10.4} {:<3} 0  0  0  0  0  0  0  0  0  0  0  0",
                pos.x,
                pos.y,
                pos.z,
                atom.element.symbol()
            )?;
        }

        for bond in molecule.bonds() {
            writeln!(
                w,
                "{:>3}{:>3}{:>3}  0",
                bond.i + 1,
                bond.j + 1,
                bond.order.to_ctfile()
            )?;
        }

        let charged: Vec<(usize, i8)> = molecule
            .atoms()
            .iter()
            .enumerate()
            .filter(|(_, a)| a.formal_charge != 0)
            .map(|(i, a)| (i + 1, a.formal_charge))
            .collect();
        for chunk in charged.chunks(CHARGES_PER_LINE) {
            write!(w, "{}{:>3}", CHARGE_RECORD, chunk.len())?;
            for (serial, charge) in chunk {
                write!(w, "{:>4}{:>4}", serial, charge)?;
            }
            writeln!(w)?;
        }
        writeln!(w, "{}", END_OF_BLOCK)?;

        writeln!(w, "> <conformer_id>\n{}\n", conformer.id())?;
        if let Some(energy) = conformer.energy() {
            writeln!(w, "> <energy>\n{:.6}\n", energy)?;
        }
        writeln!(w, "{}", RECORD_TERMINATOR)?;

        self.records += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::conformer::ConformerId;
    use std::io::Cursor;

    const ETHANOL: &str = "\
ethanol
  handmade

  3  2  0  0  0  0  0  0  0  0999 V2000
   -0.8883    0.1670   -0.0273 C   0  0  0  0  0  0  0  0  0  0  0  0
    0.4658   -0.5116   -0.0368 C   0  0  0  0  0  0  0  0  0  0  0  0
    1.4311    0.3229    0.5867 O   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0
  2  3  1  0
M  END
";

    fn read(text: &str) -> Result<Molecule, SdfError> {
        SdfFile::read_from(&mut Cursor::new(text.as_bytes()))
    }

    #[test]
    fn reads_name_atoms_and_bonds() {
        let mol = read(ETHANOL).unwrap();
        assert_eq!(mol.name(), "ethanol");
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(mol.atoms()[2].element, Element::O);
        assert!((mol.atoms()[0].position.x + 0.8883).abs() < 1e-9);
        assert_eq!(mol.bond_order(1, 2), Some(BondOrder::Single));
    }

    #[test]
    fn reads_only_the_first_record() {
        let text = format!("{ETHANOL}$$$$\n{}", ETHANOL.replace("ethanol", "second"));
        let mol = read(&text).unwrap();
        assert_eq!(mol.name(), "ethanol");
    }

    #[test]
    fn charge_records_override_atom_block_charges() {
        let text = "\
ammonium
  handmade

  1  0  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 N   0  5  0  0  0  0  0  0  0  0  0  0
M  CHG  1   1   1
M  END
";
        let mol = read(text).unwrap();
        assert_eq!(mol.atoms()[0].formal_charge, 1);
    }

    #[test]
    fn atom_block_charge_codes_are_decoded() {
        let text = ETHANOL.replace(
            "1.4311    0.3229    0.5867 O   0  0",
            "1.4311    0.3229    0.5867 O   0  5",
        );
        let mol = read(&text).unwrap();
        assert_eq!(mol.atoms()[2].formal_charge, -1);
    }

    #[test]
    fn rejects_unknown_element() {
        let text = ETHANOL.replace(" O   0", " Xx  0");
        assert!(matches!(
            read(&text),
            Err(SdfError::Parse {
                line: 7,
                kind: SdfParseErrorKind::InvalidElement(_)
            })
        ));
    }

    #[test]
    fn rejects_bond_to_missing_atom() {
        let text = ETHANOL.replace("  2  3  1  0", "  2  9  1  0");
        assert!(matches!(
            read(&text),
            Err(SdfError::Parse {
                line: 9,
                kind: SdfParseErrorKind::InvalidBond(MoleculeError::AtomIndexOutOfRange { .. })
            })
        ));
    }

    #[test]
    fn rejects_malformed_coordinates() {
        let text = ETHANOL.replace("-0.8883", "abcdefg");
        assert!(matches!(
            read(&text),
            Err(SdfError::Parse {
                kind: SdfParseErrorKind::InvalidFloat { .. },
                ..
            })
        ));
    }

    #[test]
    fn rejects_v3000_and_truncated_blocks() {
        let v3000 = ETHANOL.replace("0999 V2000", "0999 V3000");
        assert!(matches!(
            read(&v3000),
            Err(SdfError::Parse {
                kind: SdfParseErrorKind::UnsupportedVersion,
                ..
            })
        ));

        let truncated: String = ETHANOL.lines().take(6).map(|l| format!("{l}\n")).collect();
        assert!(matches!(
            read(&truncated),
            Err(SdfError::Parse {
                kind: SdfParseErrorKind::Truncated { block: "atom", .. },
                ..
            })
        ));
    }

    #[test]
    fn rejects_missing_end_and_empty_input() {
        let no_end = ETHANOL.replace("M  END\n", "");
        assert!(matches!(
            read(&no_end),
            Err(SdfError::MissingRecord(END_OF_BLOCK))
        ));
        assert!(matches!(read(""), Err(SdfError::Empty)));
        assert!(matches!(read("\n\n"), Err(SdfError::Empty)));
        assert!(matches!(
            read("not a molfile\n"),
            Err(SdfError::MissingRecord("counts line"))
        ));
    }

    #[test]
    fn rejects_hypervalent_carbon() {
        let text = "\
bad
  handmade

  6  5  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    1.0000    0.0000    0.0000 F   0  0  0  0  0  0  0  0  0  0  0  0
   -1.0000    0.0000    0.0000 F   0  0  0  0  0  0  0  0  0  0  0  0
    0.0000    1.0000    0.0000 F   0  0  0  0  0  0  0  0  0  0  0  0
    0.0000   -1.0000    0.0000 F   0  0  0  0  0  0  0  0  0  0  0  0
    0.0000    0.0000    1.0000 F   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0
  1  3  1  0
  1  4  1  0
  1  5  1  0
  1  6  1  0
M  END
";
        assert!(matches!(
            read(text),
            Err(SdfError::Valence {
                atom: 1,
                element: Element::C,
                valence: 5,
                max: 4
            })
        ));
    }

    #[test]
    fn writes_one_record_per_conformer_in_id_order() {
        let mut mol = read(ETHANOL).unwrap();
        let mut shifted = mol.reference_positions();
        for p in shifted.iter_mut() {
            p.x += 10.0;
        }
        let mut second = Conformer::new(ConformerId(1), shifted);
        second.set_energy(-3.5);
        mol.add_conformer(second).unwrap();
        mol.add_conformer(Conformer::new(ConformerId(0), mol.reference_positions()))
            .unwrap();

        let mut buf = Vec::new();
        let written = SdfFile::write_to(&mol, &mut buf).unwrap();
        assert_eq!(written, 2);

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.matches(RECORD_TERMINATOR).count(), 2);
        let first_id = text.find("> <conformer_id>\n0").unwrap();
        let second_id = text.find("> <conformer_id>\n1").unwrap();
        assert!(first_id < second_id);
        assert!(text.contains("> <energy>\n-3.500000"));

        let reread = read(&text).unwrap();
        assert_eq!(reread.atom_count(), 3);
        assert!((reread.atoms()[0].position.x + 0.8883).abs() < 1e-4);
    }

    #[test]
    fn writes_nothing_without_conformers() {
        let mol = read(ETHANOL).unwrap();
        let mut buf = Vec::new();
        assert_eq!(SdfFile::write_to(&mol, &mut buf).unwrap(), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn charged_records_round_trip() {
        let mut mol = read(ETHANOL).unwrap();
        mol.atom_mut(2).unwrap().formal_charge = -1;
        mol.add_conformer(Conformer::new(ConformerId(0), mol.reference_positions()))
            .unwrap();

        let mut buffer = Vec::new();
        assert_eq!(SdfFile::write_to(&mol, &mut buffer).unwrap(), 1);
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("M  CHG  1   3  -1"));
        let reread = read(&text).unwrap();
        assert_eq!(reread.atoms()[2].formal_charge, -1);
    }

    #[test]
    fn oversized_molecule_is_rejected_before_writing() {
        let mut mol = Molecule::new("hydrogen cloud");
        for i in 0..1000 {
            mol.add_atom(Atom::new(Element::H, Point3::new(i as f64, 0.0, 0.0)))
                .unwrap();
        }
        let conformer = Conformer::new(ConformerId(0), mol.reference_positions());

        let mut writer = SdfWriter::new(Vec::new());
        let err = writer.write_conformer(&mol, &conformer).unwrap_err();

        assert!(matches!(
            err,
            SdfError::TooLarge {
                block: "atom",
                count: 1000
            }
        ));
        assert_eq!(writer.records_written(), 0);
        assert!(writer.finish().unwrap().is_empty());
    }

    #[test]
    fn pyrrole_without_nitrogen_hydrogen_is_rejected() {
        // Aromatic bond type 4 throughout, nitrogen first, no explicit N-H.
        let pyrrole = "\
pyrrole
  handmade

  5  5  0  0  0  0  0  0  0  0999 V2000
    0.0000    1.1400    0.0000 N   0  0  0  0  0  0  0  0  0  0  0  0
    1.1200    0.3600    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    0.7000   -0.9500    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
   -0.7000   -0.9500    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
   -1.1200    0.3600    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  4  0
  2  3  4  0
  3  4  4  0
  4  5  4  0
  5  1  4  0
M  END
";
        let err = read(pyrrole).unwrap_err();
        assert!(matches!(
            err,
            SdfError::AmbiguousAromaticity {
                atom: 1,
                element: Element::N
            }
        ));

        let with_hydrogen = pyrrole
            .replace("  5  5  0", "  6  6  0")
            .replace(
                "  1  2  4  0",
                "    0.0000    2.1500    0.0000 H   0  0  0  0  0  0  0  0  0  0  0  0\n  1  2  4  0",
            )
            .replace("M  END", "  1  6  1  0\nM  END");
        let mol = read(&with_hydrogen).unwrap();
        assert_eq!(mol.atom_count(), 6);
    }
}
