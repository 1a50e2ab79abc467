//! Maximum-weight matching in general graphs (Edmonds' blossom algorithm).
//!
//! Primal-dual implementation with O(n³) time. Blossoms are stored in flat
//! arrays indexed `0..2n`: indices below `n` are single vertices (trivial
//! blossoms), indices `n..2n` are slots for non-trivial blossoms. An edge
//! `k` has two endpoints `2k` and `2k + 1`; `endpoint[p]` is the vertex at
//! endpoint `p`, and `p ^ 1` is the opposite endpoint.
//!
//! Labels: `0` free, `1` S (outer), `2` T (inner), `5` breadcrumb while
//! scanning for a blossom base, `-1` on an expanded blossom slot.
//!
//! # References
//!
//! - Edmonds (1965), "Paths, trees, and flowers"
//! - Galil (1986), "Efficient algorithms for finding maximum matching in graphs"

const NONE: usize = usize::MAX;

/// Computes a maximum-weight matching among all maximum-cardinality
/// matchings of the graph on `vertex_count` vertices with `edges`
/// `(u, v, weight)`.
///
/// Returns `mate`, where `mate[v]` is the vertex matched to `v` or
/// `usize::MAX` when `v` is unmatched.
pub fn max_weight_max_cardinality(vertex_count: usize, edges: &[(usize, usize, f64)]) -> Vec<usize> {
    if vertex_count == 0 || edges.is_empty() {
        return vec![NONE; vertex_count];
    }
    Solver::new(vertex_count, edges).run()
}

struct Solver<'a> {
    n: usize,
    edges: &'a [(usize, usize, f64)],
    endpoint: Vec<usize>,
    neighbend: Vec<Vec<usize>>,
    /// Remote endpoint of the matched edge, per vertex.
    mate: Vec<usize>,
    label: Vec<i8>,
    labelend: Vec<usize>,
    inblossom: Vec<usize>,
    blossomparent: Vec<usize>,
    blossomchilds: Vec<Vec<usize>>,
    blossombase: Vec<usize>,
    blossomendps: Vec<Vec<usize>>,
    bestedge: Vec<usize>,
    blossombestedges: Vec<Option<Vec<usize>>>,
    unusedblossoms: Vec<usize>,
    dualvar: Vec<f64>,
    allowedge: Vec<bool>,
    queue: Vec<usize>,
}

impl<'a> Solver<'a> {
    fn new(n: usize, edges: &'a [(usize, usize, f64)]) -> Self {
        let max_weight = edges.iter().fold(0.0f64, |m, e| m.max(e.2));

        let endpoint: Vec<usize> = (0..2 * edges.len())
            .map(|p| if p % 2 == 0 { edges[p / 2].0 } else { edges[p / 2].1 })
            .collect();
        let mut neighbend = vec![Vec::new(); n];
        for (k, &(i, j, _)) in edges.iter().enumerate() {
            neighbend[i].push(2 * k + 1);
            neighbend[j].push(2 * k);
        }

        let mut dualvar = vec![max_weight; n];
        dualvar.extend(std::iter::repeat(0.0).take(n));
        let mut blossombase: Vec<usize> = (0..n).collect();
        blossombase.extend(std::iter::repeat(NONE).take(n));

        Self {
            n,
            edges,
            endpoint,
            neighbend,
            mate: vec![NONE; n],
            label: vec![0; 2 * n],
            labelend: vec![NONE; 2 * n],
            inblossom: (0..n).collect(),
            blossomparent: vec![NONE; 2 * n],
            blossomchilds: vec![Vec::new(); 2 * n],
            blossombase,
            blossomendps: vec![Vec::new(); 2 * n],
            bestedge: vec![NONE; 2 * n],
            blossombestedges: vec![None; 2 * n],
            unusedblossoms: (n..2 * n).collect(),
            dualvar,
            allowedge: vec![false; edges.len()],
            queue: Vec::new(),
        }
    }

    /// Twice the reduced cost of edge `k`.
    fn slack(&self, k: usize) -> f64 {
        let (i, j, w) = self.edges[k];
        self.dualvar[i] + self.dualvar[j] - 2.0 * w
    }

    /// Vertices contained in blossom `b`.
    fn leaves(&self, b: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![b];
        while let Some(t) = stack.pop() {
            if t < self.n {
                out.push(t);
            } else {
                stack.extend(self.blossomchilds[t].iter().rev());
            }
        }
        out
    }

    /// Labels `w` and its top-level blossom with `t`, reached through
    /// endpoint `p`. A T-label propagates an S-label to the base's mate.
    fn assign_label(&mut self, w: usize, t: i8, p: usize) {
        let b = self.inblossom[w];
        self.label[w] = t;
        self.label[b] = t;
        self.labelend[w] = p;
        self.labelend[b] = p;
        self.bestedge[w] = NONE;
        self.bestedge[b] = NONE;
        if t == 1 {
            let leaves = self.leaves(b);
            self.queue.extend(leaves);
        } else if t == 2 {
            let base = self.blossombase[b];
            let mate_end = self.mate[base];
            let next = self.endpoint[mate_end];
            self.assign_label(next, 1, mate_end ^ 1);
        }
    }

    /// Traces back from `v` and `w` to find a common ancestor in the
    /// alternating tree. Returns the new blossom's base, or `NONE` when
    /// the paths reach two different roots (an augmenting path).
    fn scan_blossom(&mut self, mut v: usize, mut w: usize) -> usize {
        let mut path = Vec::new();
        let mut base = NONE;
        while v != NONE || w != NONE {
            let mut b = self.inblossom[v];
            if self.label[b] & 4 != 0 {
                base = self.blossombase[b];
                break;
            }
            path.push(b);
            self.label[b] = 5;
            if self.labelend[b] == NONE {
                v = NONE;
            } else {
                v = self.endpoint[self.labelend[b]];
                b = self.inblossom[v];
                v = self.endpoint[self.labelend[b]];
            }
            if w != NONE {
                std::mem::swap(&mut v, &mut w);
            }
        }
        for b in path {
            self.label[b] = 1;
        }
        base
    }

    /// Shrinks the odd cycle closed by edge `k` into a new S-blossom with
    /// the given base.
    fn add_blossom(&mut self, base: usize, k: usize) {
        let (v, w, _) = self.edges[k];
        let bb = self.inblossom[base];
        let mut bv = self.inblossom[v];
        let mut bw = self.inblossom[w];

        // A laminar family over n leaves never holds more than n - 1
        // non-trivial blossoms, so a free slot always exists.
        let b = match self.unusedblossoms.pop() {
            Some(b) => b,
            None => unreachable!("no free blossom slot"),
        };
        self.blossombase[b] = base;
        self.blossomparent[b] = NONE;
        self.blossomparent[bb] = b;

        let mut path = Vec::new();
        let mut endps = Vec::new();
        while bv != bb {
            self.blossomparent[bv] = b;
            path.push(bv);
            endps.push(self.labelend[bv]);
            bv = self.inblossom[self.endpoint[self.labelend[bv]]];
        }
        path.push(bb);
        path.reverse();
        endps.reverse();
        endps.push(2 * k);
        while bw != bb {
            self.blossomparent[bw] = b;
            path.push(bw);
            endps.push(self.labelend[bw] ^ 1);
            bw = self.inblossom[self.endpoint[self.labelend[bw]]];
        }

        self.label[b] = 1;
        self.labelend[b] = self.labelend[bb];
        self.dualvar[b] = 0.0;
        self.blossomchilds[b] = path.clone();
        self.blossomendps[b] = endps;

        for leaf in self.leaves(b) {
            if self.label[self.inblossom[leaf]] == 2 {
                // Former T-vertices become S-vertices and must be scanned.
                self.queue.push(leaf);
            }
            self.inblossom[leaf] = b;
        }

        // Least-slack edges from the new blossom to each neighbouring
        // S-blossom.
        let mut bestedgeto = vec![NONE; 2 * self.n];
        for &sub in &path {
            let lists: Vec<Vec<usize>> = match self.blossombestedges[sub].take() {
                Some(list) => vec![list],
                None => self
                    .leaves(sub)
                    .into_iter()
                    .map(|leaf| self.neighbend[leaf].iter().map(|p| p / 2).collect())
                    .collect(),
            };
            for list in lists {
                for k in list {
                    let (i, j, _) = self.edges[k];
                    let j = if self.inblossom[j] == b { i } else { j };
                    let bj = self.inblossom[j];
                    if bj != b
                        && self.label[bj] == 1
                        && (bestedgeto[bj] == NONE || self.slack(k) < self.slack(bestedgeto[bj]))
                    {
                        bestedgeto[bj] = k;
                    }
                }
            }
            self.bestedge[sub] = NONE;
        }

        let best: Vec<usize> = bestedgeto.into_iter().filter(|&k| k != NONE).collect();
        self.bestedge[b] = NONE;
        for &k in &best {
            if self.bestedge[b] == NONE || self.slack(k) < self.slack(self.bestedge[b]) {
                self.bestedge[b] = k;
            }
        }
        self.blossombestedges[b] = Some(best);
    }

    /// Dissolves blossom `b` into its sub-blossoms. Outside the end stage a
    /// T-blossom's children are relabelled along the even-length path from
    /// the entry child to the base.
    fn expand_blossom(&mut self, b: usize, endstage: bool) {
        let childs = self.blossomchilds[b].clone();
        for &s in &childs {
            self.blossomparent[s] = NONE;
            if s < self.n {
                self.inblossom[s] = s;
            } else if endstage && self.dualvar[s] == 0.0 {
                self.expand_blossom(s, endstage);
            } else {
                for leaf in self.leaves(s) {
                    self.inblossom[leaf] = s;
                }
            }
        }

        if !endstage && self.label[b] == 2 {
            let endps = self.blossomendps[b].clone();
            let len = childs.len() as isize;
            let entrychild = self.inblossom[self.endpoint[self.labelend[b] ^ 1]];
            let mut j = position(&childs, entrychild) as isize;
            let (jstep, endptrick) = if j & 1 != 0 {
                j -= len;
                (1isize, 0usize)
            } else {
                (-1isize, 1usize)
            };

            let mut p = self.labelend[b];
            while j != 0 {
                let v = self.endpoint[p ^ 1];
                self.label[v] = 0;
                let q = cyclic(&endps, j - endptrick as isize);
                self.label[self.endpoint[q ^ endptrick ^ 1]] = 0;
                self.assign_label(v, 2, p);
                self.allowedge[q / 2] = true;
                j += jstep;
                p = cyclic(&endps, j - endptrick as isize) ^ endptrick;
                self.allowedge[p / 2] = true;
                j += jstep;
            }

            let bv = cyclic(&childs, j);
            let v = self.endpoint[p ^ 1];
            self.label[v] = 2;
            self.label[bv] = 2;
            self.labelend[v] = p;
            self.labelend[bv] = p;
            self.bestedge[bv] = NONE;

            j += jstep;
            while cyclic(&childs, j) != entrychild {
                let bv = cyclic(&childs, j);
                if self.label[bv] == 1 {
                    j += jstep;
                    continue;
                }
                let reached = self.leaves(bv).into_iter().find(|&v| self.label[v] != 0);
                if let Some(v) = reached {
                    self.label[v] = 0;
                    let mate_end = self.mate[self.blossombase[bv]];
                    self.label[self.endpoint[mate_end]] = 0;
                    let end = self.labelend[v];
                    self.assign_label(v, 2, end);
                }
                j += jstep;
            }
        }

        self.label[b] = -1;
        self.labelend[b] = NONE;
        self.blossomchilds[b].clear();
        self.blossomendps[b].clear();
        self.blossombase[b] = NONE;
        self.blossombestedges[b] = None;
        self.bestedge[b] = NONE;
        self.unusedblossoms.push(b);
    }

    /// Flips matched and unmatched edges along the path inside blossom `b`
    /// from vertex `v` to the base, then rotates `b` so `v` becomes its base.
    fn augment_blossom(&mut self, b: usize, v: usize) {
        let mut t = v;
        while self.blossomparent[t] != b {
            t = self.blossomparent[t];
        }
        if t >= self.n {
            self.augment_blossom(t, v);
        }

        let childs = self.blossomchilds[b].clone();
        let endps = self.blossomendps[b].clone();
        let len = childs.len() as isize;
        let i = position(&childs, t);
        let mut j = i as isize;
        let (jstep, endptrick) = if i & 1 != 0 {
            j -= len;
            (1isize, 0usize)
        } else {
            (-1isize, 1usize)
        };

        while j != 0 {
            j += jstep;
            let t = cyclic(&childs, j);
            let p = cyclic(&endps, j - endptrick as isize) ^ endptrick;
            if t >= self.n {
                let entry = self.endpoint[p];
                self.augment_blossom(t, entry);
            }
            j += jstep;
            let t = cyclic(&childs, j);
            if t >= self.n {
                let entry = self.endpoint[p ^ 1];
                self.augment_blossom(t, entry);
            }
            self.mate[self.endpoint[p]] = p ^ 1;
            self.mate[self.endpoint[p ^ 1]] = p;
        }

        self.blossomchilds[b].rotate_left(i);
        self.blossomendps[b].rotate_left(i);
        self.blossombase[b] = self.blossombase[self.blossomchilds[b][0]];
    }

    /// Augments the matching along the path through edge `k` between two
    /// S-vertices in different trees.
    fn augment_matching(&mut self, k: usize) {
        let (v, w, _) = self.edges[k];
        for (mut s, mut p) in [(v, 2 * k + 1), (w, 2 * k)] {
            loop {
                let bs = self.inblossom[s];
                if bs >= self.n {
                    self.augment_blossom(bs, s);
                }
                self.mate[s] = p;
                if self.labelend[bs] == NONE {
                    // Reached a tree root.
                    break;
                }
                let t = self.endpoint[self.labelend[bs]];
                let bt = self.inblossom[t];
                s = self.endpoint[self.labelend[bt]];
                let j = self.endpoint[self.labelend[bt] ^ 1];
                if bt >= self.n {
                    self.augment_blossom(bt, j);
                }
                self.mate[j] = self.labelend[bt];
                p = self.labelend[bt] ^ 1;
            }
        }
    }

    fn run(mut self) -> Vec<usize> {
        let n = self.n;

        // Each stage either augments the matching by one edge or proves it
        // maximum.
        for _ in 0..n {
            self.label.fill(0);
            self.bestedge.fill(NONE);
            for slot in &mut self.blossombestedges[n..] {
                *slot = None;
            }
            self.allowedge.fill(false);
            self.queue.clear();

            for v in 0..n {
                if self.mate[v] == NONE && self.label[self.inblossom[v]] == 0 {
                    self.assign_label(v, 1, NONE);
                }
            }

            let mut augmented = false;
            loop {
                while !augmented {
                    let Some(v) = self.queue.pop() else {
                        break;
                    };
                    for idx in 0..self.neighbend[v].len() {
                        let p = self.neighbend[v][idx];
                        let k = p / 2;
                        let w = self.endpoint[p];
                        if self.inblossom[v] == self.inblossom[w] {
                            continue;
                        }
                        let mut kslack = 0.0;
                        if !self.allowedge[k] {
                            kslack = self.slack(k);
                            if kslack <= 0.0 {
                                self.allowedge[k] = true;
                            }
                        }
                        if self.allowedge[k] {
                            let bw = self.inblossom[w];
                            if self.label[bw] == 0 {
                                self.assign_label(w, 2, p ^ 1);
                            } else if self.label[bw] == 1 {
                                let base = self.scan_blossom(v, w);
                                if base != NONE {
                                    self.add_blossom(base, k);
                                } else {
                                    self.augment_matching(k);
                                    augmented = true;
                                    break;
                                }
                            } else if self.label[w] == 0 {
                                self.label[w] = 2;
                                self.labelend[w] = p ^ 1;
                            }
                        } else if self.label[self.inblossom[w]] == 1 {
                            let b = self.inblossom[v];
                            if self.bestedge[b] == NONE || kslack < self.slack(self.bestedge[b]) {
                                self.bestedge[b] = k;
                            }
                        } else if self.label[w] == 0
                            && (self.bestedge[w] == NONE || kslack < self.slack(self.bestedge[w]))
                        {
                            self.bestedge[w] = k;
                        }
                    }
                }
                if augmented {
                    break;
                }

                // No augmenting path with tight edges: pick the smallest
                // dual adjustment that creates a new tight edge or frees a
                // T-blossom.
                let mut delta_kind = 0u8;
                let mut delta = 0.0;
                let mut delta_edge = NONE;
                let mut delta_blossom = NONE;

                for v in 0..n {
                    if self.label[self.inblossom[v]] == 0 && self.bestedge[v] != NONE {
                        let d = self.slack(self.bestedge[v]);
                        if delta_kind == 0 || d < delta {
                            delta = d;
                            delta_kind = 2;
                            delta_edge = self.bestedge[v];
                        }
                    }
                }
                for b in 0..2 * n {
                    if self.blossomparent[b] == NONE
                        && self.label[b] == 1
                        && self.bestedge[b] != NONE
                    {
                        let d = self.slack(self.bestedge[b]) / 2.0;
                        if delta_kind == 0 || d < delta {
                            delta = d;
                            delta_kind = 3;
                            delta_edge = self.bestedge[b];
                        }
                    }
                }
                for b in n..2 * n {
                    if self.blossombase[b] != NONE
                        && self.blossomparent[b] == NONE
                        && self.label[b] == 2
                        && (delta_kind == 0 || self.dualvar[b] < delta)
                    {
                        delta = self.dualvar[b];
                        delta_kind = 4;
                        delta_blossom = b;
                    }
                }
                if delta_kind == 0 {
                    // Maximum cardinality reached; finish the weight optimum.
                    delta_kind = 1;
                    delta = self.dualvar[..n]
                        .iter()
                        .copied()
                        .fold(f64::INFINITY, f64::min)
                        .max(0.0);
                }

                for v in 0..n {
                    match self.label[self.inblossom[v]] {
                        1 => self.dualvar[v] -= delta,
                        2 => self.dualvar[v] += delta,
                        _ => {}
                    }
                }
                for b in n..2 * n {
                    if self.blossombase[b] != NONE && self.blossomparent[b] == NONE {
                        match self.label[b] {
                            1 => self.dualvar[b] += delta,
                            2 => self.dualvar[b] -= delta,
                            _ => {}
                        }
                    }
                }

                match delta_kind {
                    1 => break,
                    2 => {
                        self.allowedge[delta_edge] = true;
                        let (i, j, _) = self.edges[delta_edge];
                        let s = if self.label[self.inblossom[i]] == 0 { j } else { i };
                        self.queue.push(s);
                    }
                    3 => {
                        self.allowedge[delta_edge] = true;
                        let (i, _, _) = self.edges[delta_edge];
                        self.queue.push(i);
                    }
                    _ => self.expand_blossom(delta_blossom, false),
                }
            }

            if !augmented {
                break;
            }

            for b in n..2 * n {
                if self.blossomparent[b] == NONE
                    && self.blossombase[b] != NONE
                    && self.label[b] == 1
                    && self.dualvar[b] == 0.0
                {
                    self.expand_blossom(b, true);
                }
            }
        }

        (0..n)
            .map(|v| match self.mate[v] {
                NONE => NONE,
                p => self.endpoint[p],
            })
            .collect()
    }
}

/// Index of `item` in a blossom's child list.
fn position(list: &[usize], item: usize) -> usize {
    match list.iter().position(|&x| x == item) {
        Some(i) => i,
        None => unreachable!("sub-blossom {item} missing from its parent"),
    }
}

/// Element at `i`, where negative indices count from the end.
fn cyclic(list: &[usize], i: isize) -> usize {
    list[i.rem_euclid(list.len() as isize) as usize]
}
