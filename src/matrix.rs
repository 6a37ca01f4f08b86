use std::fmt;

use crate::alphabet::*;

/// Square nucleotide substitution matrix whose diagonal is always zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubstitutionMatrix {
    entries: [[f64; ALPHABET_SIZE]; ALPHABET_SIZE],
}

impl SubstitutionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to the (source, dest) entry. Diagonal entries are left
    /// untouched.
    pub fn increment_substitution(&mut self, source: Nucleotide, dest: Nucleotide, amount: f64) {
        if source != dest {
            self.entries[source.index()][dest.index()] += amount;
        }
    }

    pub fn get(&self, source: Nucleotide, dest: Nucleotide) -> f64 {
        self.entries[source.index()][dest.index()]
    }

    /// Copy of the entries, rows indexed by source.
    pub fn to_array(&self) -> [[f64; ALPHABET_SIZE]; ALPHABET_SIZE] {
        self.entries
    }
}

impl fmt::Display for SubstitutionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, " ")?;
        for n in Nucleotide::ALL {
            write!(f, "\t{}", n)?;
        }
        writeln!(f)?;
        for source in Nucleotide::ALL {
            write!(f, "{}", source)?;
            for dest in Nucleotide::ALL {
                write!(f, "\t{}", self.get(source, dest))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Observed and expected matrices read from one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixPair {
    pub observed: SubstitutionMatrix,
    pub expected: SubstitutionMatrix,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populate(matrix: &mut SubstitutionMatrix, step: f64) {
        for source in Nucleotide::ALL {
            for dest in Nucleotide::ALL {
                matrix.increment_substitution(source, dest, step);
            }
        }
    }

    #[test]
    fn test_new_is_zero() {
        let matrix = SubstitutionMatrix::new();
        assert!(matrix.to_array().iter().flatten().all(|&x| x == 0.0));
    }

    #[test]
    fn test_diagonal_stays_zero() {
        let mut matrix = SubstitutionMatrix::new();
        populate(&mut matrix, 1.0);

        for source in Nucleotide::ALL {
            for dest in Nucleotide::ALL {
                let expected = if source == dest { 0.0 } else { 1.0 };
                assert_eq!(matrix.get(source, dest), expected, "{source} -> {dest}");
            }
        }

        matrix.increment_substitution(G, G, 42.0);
        assert_eq!(matrix.get(G, G), 0.0);
    }

    #[test]
    fn test_copy_is_independent() {
        let mut matrix = SubstitutionMatrix::new();
        populate(&mut matrix, 1.0);
        let original = matrix.to_array();

        let mut copy = matrix.to_array();
        copy.iter_mut().flatten().for_each(|x| *x = -1.0);
        let mut cloned = matrix.clone();
        populate(&mut cloned, 5.0);

        assert_eq!(matrix.to_array(), original);
        assert_ne!(cloned, matrix);
    }
}
