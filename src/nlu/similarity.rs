//! # Similaridade entre Tokens
//!
//! Igualdade "difusa" usada pelo classificador e pelos detectores de frases.
//! Dois tokens são considerados similares se um contém o outro **ou** se a
//! distância de edição (Levenshtein) entre eles não passa do limiar.
//!
//! | Uso | Limiar |
//! |-----|--------|
//! | Keywords de tópicos | 2 |
//! | Afirmativo / negativo | 1 (evita que "no" case com "nos", "yo"...) |

/// Limiar padrão para comparação de keywords.
pub const DEFAULT_THRESHOLD: usize = 2;

/// Distância de edição clássica (inserção, remoção e substituição com custo 1).
///
/// Opera sobre `char`s, não bytes, então "envío" e "envio" estão a
/// distância 1. Usa duas linhas da matriz de programação dinâmica.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    // a linha acompanha a string mais curta
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    if short.is_empty() {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0; short.len() + 1];

    for (i, lc) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            curr[j + 1] = if lc == sc {
                prev[j]
            } else {
                1 + prev[j].min(prev[j + 1]).min(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

/// `true` se `a` contém `b`, `b` contém `a`, ou a distância é `<= threshold`.
pub fn is_similar(a: &str, b: &str, threshold: usize) -> bool {
    if a.contains(b) || b.contains(a) {
        return true;
    }
    edit_distance(a, b) <= threshold
}
