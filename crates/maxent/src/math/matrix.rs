/// Per-(class, document) conditional probabilities, stored class-major so that
/// the flat key of `(class, doc)` is `class * num_docs + doc`.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbabilityMatrix {
    data: Vec<f64>,
    classes: usize,
    docs: usize,
}

impl ProbabilityMatrix {
    pub fn new(classes: usize, docs: usize) -> Self {
        Self {
            data: vec![0.0; classes * docs],
            classes,
            docs,
        }
    }

    #[inline]
    pub fn key(&self, class: usize, doc: usize) -> usize {
        class * self.docs + doc
    }

    pub fn get(&self, class: usize, doc: usize) -> f64 {
        self.data[self.key(class, doc)]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Split the matrix into disjoint document ranges of `block_len` documents
    /// (the last one possibly shorter). Each block holds one mutable slice per
    /// class row, covering exactly its own documents.
    pub fn doc_blocks_mut(&mut self, block_len: usize) -> Vec<DocBlockMut<'_>> {
        let docs = self.docs;
        if docs == 0 {
            return Vec::new();
        }
        let block_len = block_len.max(1);
        let classes = self.classes;
        let mut blocks: Vec<DocBlockMut<'_>> = (0..docs.div_ceil(block_len))
            .map(|b| DocBlockMut {
                start: b * block_len,
                len: block_len.min(docs - b * block_len),
                rows: Vec::with_capacity(classes),
            })
            .collect();

        for row in self.data.chunks_mut(docs) {
            for (block, chunk) in blocks.iter_mut().zip(row.chunks_mut(block_len)) {
                block.rows.push(chunk);
            }
        }
        blocks
    }
}

/// Mutable view of the probabilities of documents `start..start + len`.
#[derive(Debug)]
pub struct DocBlockMut<'a> {
    start: usize,
    len: usize,
    rows: Vec<&'a mut [f64]>,
}

impl<'a> DocBlockMut<'a> {
    /// Documents covered by this block, as corpus indices.
    pub fn docs(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len
    }

    /// Store P(class | doc) where `doc` is a corpus index inside the block.
    #[inline]
    pub fn set(&mut self, class: usize, doc: usize, value: f64) {
        self.rows[class][doc - self.start] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_cover_every_cell_once() {
        let mut p = ProbabilityMatrix::new(3, 5);
        {
            let mut blocks = p.doc_blocks_mut(2);
            assert_eq!(blocks.len(), 3);
            assert_eq!(blocks[2].docs(), 4..5);
            for block in blocks.iter_mut() {
                for doc in block.docs() {
                    for class in 0..3 {
                        block.set(class, doc, (class * 10 + doc) as f64);
                    }
                }
            }
        }
        for class in 0..3 {
            for doc in 0..5 {
                assert_eq!(p.get(class, doc), (class * 10 + doc) as f64);
                assert_eq!(p.as_slice()[p.key(class, doc)], (class * 10 + doc) as f64);
            }
        }
    }

    #[test]
    fn empty_matrix_has_no_blocks() {
        let mut p = ProbabilityMatrix::new(2, 0);
        assert!(p.doc_blocks_mut(4).is_empty());
    }

    #[test]
    fn oversized_block_is_single() {
        let mut p = ProbabilityMatrix::new(2, 3);
        let blocks = p.doc_blocks_mut(10);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].docs(), 0..3);
    }
}
